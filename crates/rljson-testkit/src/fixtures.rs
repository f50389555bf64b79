//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use rljson::Store;
use serde_json::{json, Map, Value};

/// A small linked table set.
///
/// `tableA` holds two plain records, `tableB` one record linking to the
/// first of them and `tableC` a record with a nested object and an array.
pub fn example_tables() -> Value {
    let store = Store::new()
        .add_data(&json!({"tableA": {"_data": [{"a": "a0"}, {"a": "a1"}]}}))
        .expect("example tableA is valid");
    let a0 = store
        .hash("tableA", 0)
        .expect("tableA has a first record")
        .to_string();

    json!({
        "tableA": {"_data": [{"a": "a0"}, {"a": "a1"}]},
        "tableB": {"_data": [{"b": 1, "tableARef": a0}]},
        "tableC": {"_data": [{"nested": {"x": [1, 2.5, null]}, "flag": true}]}
    })
}

/// Table set with a record linking to a table that does not exist.
pub fn missing_table_link() -> Value {
    json!({"tableA": {"_data": [{"tableXRef": "abc"}]}})
}

/// Table set with a record linking to a hash that does not exist.
pub fn missing_item_link() -> Value {
    json!({
        "tableA": {"_data": [{"a": "a0"}]},
        "tableB": {"_data": [{"tableARef": "doesNotExist"}]}
    })
}

/// Builds a store table by table, resolving links by position.
#[derive(Debug, Clone, Default)]
pub struct StoreFixture {
    store: Store,
}

impl StoreFixture {
    /// Start from an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from [`example_tables`].
    pub fn with_example_data() -> Self {
        Self::new().merge(&example_tables())
    }

    /// Merge a raw table set.
    ///
    /// Panics if the store rejects it.
    pub fn merge(self, data: &Value) -> Self {
        let store = self
            .store
            .add_data(data)
            .unwrap_or_else(|e| panic!("fixture data rejected: {e}"));
        Self { store }
    }

    /// Append `records` to `table`.
    pub fn add(self, table: &str, records: Vec<Value>) -> Self {
        let mut tables = Map::new();
        tables.insert(table.to_string(), json!({"_data": records}));
        self.merge(&Value::Object(tables))
    }

    /// Append one record to `table` that links to `target_table[target_index]`.
    ///
    /// The link is written as `<target_table>Ref` into `fields`, which must
    /// be an object.
    pub fn add_linked(
        self,
        table: &str,
        target_table: &str,
        target_index: usize,
        mut fields: Value,
    ) -> Self {
        let target = self.hash(target_table, target_index);
        fields
            .as_object_mut()
            .expect("linked record fields must be an object")
            .insert(format!("{target_table}Ref"), Value::String(target));
        self.add(table, vec![fields])
    }

    /// Hash of the record at `index` in `table`.
    pub fn hash(&self, table: &str, index: usize) -> String {
        self.store
            .hash(table, index)
            .unwrap_or_else(|e| panic!("no record {index} in {table}: {e}"))
            .to_string()
    }

    /// The store built so far.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Consume the fixture.
    pub fn into_store(self) -> Store {
        self.store
    }
}

/// Route `tracing` output through the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rljson::{MissingTarget, StoreError};

    #[test]
    fn test_example_tables_are_consistent() {
        init_tracing();
        let fixture = StoreFixture::with_example_data();
        let store = fixture.store();

        assert_eq!(store.table_names().collect::<Vec<_>>(), ["tableA", "tableB", "tableC"]);
        assert!(store.check_links().is_ok());

        let b0 = fixture.hash("tableB", 0);
        assert_eq!(store.get("tableB", &b0, &["tableARef", "a"]).unwrap(), "a0");
    }

    #[test]
    fn test_fixture_linked_chain() {
        init_tracing();
        let fixture = StoreFixture::new()
            .add("tableA", vec![json!({"a": "a0"}), json!({"a": "a1"})])
            .add_linked("tableB", "tableA", 1, json!({"b": "b0"}))
            .add_linked("tableC", "tableB", 0, json!({}));

        let c0 = fixture.hash("tableC", 0);
        let value = fixture
            .store()
            .get("tableC", &c0, &["tableBRef", "tableARef", "a"])
            .unwrap();
        assert_eq!(value, "a1");
    }

    #[test]
    fn test_missing_table_link_fixture() {
        let store = StoreFixture::new().merge(&missing_table_link()).into_store();
        assert!(matches!(
            store.check_links(),
            Err(StoreError::DanglingTableRef { .. })
        ));
    }

    #[test]
    fn test_missing_item_link_fixture() {
        let store = StoreFixture::new().merge(&missing_item_link()).into_store();
        let broken = store.broken_links();
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].missing, MissingTarget::Item);
        assert_eq!(broken[0].target_hash, "doesNotExist");
    }
}
