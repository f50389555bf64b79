//! Flattening a store into addressable leaf paths.

use crate::store::Store;

impl Store {
    /// One `"<table>/<hash>/<field>"` entry per non-hash field of every
    /// record.
    ///
    /// Tables come in name order, records in insertion order and fields in
    /// key order, so the listing is stable for equal stores.
    pub fn ls(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for (name, table) in self.tables() {
            for record in table.records() {
                for (field, _) in record.fields() {
                    paths.push(format!("{name}/{}/{field}", record.hash()));
                }
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ls_empty() {
        assert!(Store::new().ls().is_empty());
    }

    #[test]
    fn test_ls_lists_fields() {
        let store = Store::new()
            .add_data(&json!({
                "tableB": {"_data": [{"y": 1, "x": 2}]},
                "tableA": {"_data": [{"a": "a0"}, {"a": "a1"}]}
            }))
            .unwrap();

        let a0 = store.hash("tableA", 0).unwrap();
        let a1 = store.hash("tableA", 1).unwrap();
        let b0 = store.hash("tableB", 0).unwrap();

        assert_eq!(
            store.ls(),
            vec![
                format!("tableA/{a0}/a"),
                format!("tableA/{a1}/a"),
                format!("tableB/{b0}/x"),
                format!("tableB/{b0}/y"),
            ]
        );
    }

    #[test]
    fn test_ls_skips_empty_records() {
        let store = Store::new()
            .add_data(&json!({"tableA": {"_data": [{}]}}))
            .unwrap();
        assert!(store.ls().is_empty());
    }
}
