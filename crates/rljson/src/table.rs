//! Tables: ordered records plus their hash index.
//!
//! A [`Table`] is only ever built by [`normalize`] or
//! [`Table::merged_with`], both of which derive the index from the
//! ordered record list. The two can never diverge.

use std::collections::HashMap;

use rljson_core::{
    content_hash, value_kind, ContentHash, HashError, Record, RecordError, DATA_KEY, HASH_KEY,
};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{Result, StoreError, TableViolation};

/// A named table's content: records in insertion order, indexed by hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    records: Vec<Record>,
    /// Content hash -> position in `records`.
    index: HashMap<ContentHash, usize>,
    /// Table-level fields other than `_data` and `_hash`.
    properties: Map<String, Value>,
    hash: ContentHash,
}

impl Table {
    fn build(records: impl IntoIterator<Item = Record>, properties: Map<String, Value>) -> Self {
        let mut kept = Vec::new();
        let mut index = HashMap::new();

        for record in records {
            if index.contains_key(record.hash()) {
                trace!(hash = %record.hash(), "dropping duplicate record");
                continue;
            }
            index.insert(record.hash().clone(), kept.len());
            kept.push(record);
        }

        let hash = table_hash(&kept, &properties);
        Self {
            records: kept,
            index,
            properties,
            hash,
        }
    }

    /// Append the records of `incoming` whose hashes are not present yet.
    ///
    /// Existing records keep their order; new ones follow in the order of
    /// `incoming`. Returns `None` when nothing would be added. Properties
    /// of `self` win over those of `incoming`.
    pub fn merged_with(&self, incoming: &Table) -> Option<Table> {
        let fresh: Vec<&Record> = incoming
            .records
            .iter()
            .filter(|record| {
                let known = self.index.contains_key(record.hash());
                if known {
                    trace!(hash = %record.hash(), "dropping duplicate record");
                }
                !known
            })
            .collect();

        if fresh.is_empty() {
            return None;
        }

        let records = self
            .records
            .iter()
            .chain(fresh)
            .cloned()
            .collect::<Vec<_>>();
        Some(Self::build(records, self.properties.clone()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by content hash.
    pub fn get(&self, hash: &str) -> Option<&Record> {
        self.index.get(hash).map(|&i| &self.records[i])
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.index.contains_key(hash)
    }

    /// Position of a record in insertion order.
    pub fn position(&self, hash: &str) -> Option<usize> {
        self.index.get(hash).copied()
    }

    /// Hash of the record at `position` in insertion order.
    pub fn hash_at(&self, position: usize) -> Option<&ContentHash> {
        self.records.get(position).map(Record::hash)
    }

    /// The hash index, in no particular order.
    pub fn index(&self) -> impl Iterator<Item = (&ContentHash, &Record)> {
        self.index
            .iter()
            .map(move |(hash, &i)| (hash, &self.records[i]))
    }

    /// Content hash of the whole table.
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// The table's canonical form: `{"_data": [...], "_hash": ...}`.
    pub fn to_value(&self) -> Value {
        let mut map = table_content(&self.records, &self.properties);
        map.insert(HASH_KEY.to_string(), self.hash.clone().into());
        Value::Object(map)
    }
}

fn table_content(records: &[Record], properties: &Map<String, Value>) -> Map<String, Value> {
    let mut map = properties.clone();
    map.insert(
        DATA_KEY.to_string(),
        Value::Array(records.iter().map(|r| r.as_value().clone()).collect()),
    );
    map
}

fn table_hash(records: &[Record], properties: &Map<String, Value>) -> ContentHash {
    content_hash(&Value::Object(table_content(records, properties)))
}

/// Record every structural problem of one table value.
pub(crate) fn check_structure(name: &str, value: &Value, violations: &mut Vec<TableViolation>) {
    match value.get(DATA_KEY) {
        None => violations.push(TableViolation::MissingData {
            table: name.to_string(),
        }),
        Some(Value::Array(items)) => {
            for (position, item) in items.iter().enumerate() {
                if !item.is_object() {
                    violations.push(TableViolation::RecordNotObject {
                        table: name.to_string(),
                        position,
                        found: value_kind(item),
                    });
                }
            }
        }
        Some(other) => violations.push(TableViolation::WrongDataType {
            table: name.to_string(),
            found: value_kind(other),
        }),
    }
}

/// Build the hash-indexed table from a table value with hashed records.
///
/// Records sharing a hash are stored once; the first occurrence wins.
pub fn normalize(name: &str, value: &Value) -> Result<Table> {
    let mut violations = Vec::new();
    check_structure(name, value, &mut violations);
    if !violations.is_empty() {
        return Err(StoreError::InvalidTables(violations));
    }

    let items: &[Value] = match value.get(DATA_KEY) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    };

    let records = items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            Record::from_value(item.clone()).map_err(|e| match e {
                RecordError::NotAnObject { found } => {
                    StoreError::InvalidTables(vec![TableViolation::RecordNotObject {
                        table: name.to_string(),
                        position,
                        found,
                    }])
                }
                RecordError::MissingHash => StoreError::Hash(HashError::Missing {
                    path: format!("/{name}/{DATA_KEY}/{position}"),
                }),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let properties = value
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(key, _)| key.as_str() != DATA_KEY && key.as_str() != HASH_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(Table::build(records, properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rljson_core::assign_hashes;
    use serde_json::json;

    fn hashed_table(value: Value) -> Table {
        normalize("t", &assign_hashes(&value)).unwrap()
    }

    #[test]
    fn test_normalize_indexes_records() {
        let table = hashed_table(json!({"_data": [{"a": 1}, {"a": 2}]}));

        assert_eq!(table.len(), 2);
        for (i, record) in table.records().iter().enumerate() {
            assert_eq!(table.get(record.hash().as_str()), Some(record));
            assert_eq!(table.position(record.hash().as_str()), Some(i));
        }
        assert_eq!(table.index().count(), 2);
    }

    #[test]
    fn test_normalize_missing_data() {
        let err = normalize("t", &json!({"rows": []})).unwrap_err();
        assert_eq!(
            err.violations(),
            &[TableViolation::MissingData { table: "t".into() }]
        );
    }

    #[test]
    fn test_normalize_wrong_data_type() {
        let err = normalize("t", &json!({"_data": {"a": 1}})).unwrap_err();
        assert_eq!(
            err.violations(),
            &[TableViolation::WrongDataType {
                table: "t".into(),
                found: "object"
            }]
        );
    }

    #[test]
    fn test_normalize_rejects_non_object_record() {
        let data = assign_hashes(&json!({"_data": [{"a": 1}, "x"]}));
        let err = normalize("t", &data).unwrap_err();
        assert_eq!(
            err.violations(),
            &[TableViolation::RecordNotObject {
                table: "t".into(),
                position: 1,
                found: "string"
            }]
        );
    }

    #[test]
    fn test_normalize_requires_hashes() {
        let err = normalize("t", &json!({"_data": [{"a": 1}]})).unwrap_err();
        assert!(matches!(err, StoreError::Hash(HashError::Missing { .. })));
    }

    #[test]
    fn test_duplicates_in_one_table_stored_once() {
        let table = hashed_table(json!({"_data": [{"a": 1}, {"a": 2}, {"a": 1}]}));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_merge_appends_new_in_order() {
        let old = hashed_table(json!({"_data": [{"a": 0}, {"a": 1}]}));
        let new = hashed_table(json!({"_data": [{"a": 3}, {"a": 0}, {"a": 2}]}));

        let merged = old.merged_with(&new).unwrap();
        let values: Vec<&Value> = merged.records().iter().map(|r| &r.as_value()["a"]).collect();
        assert_eq!(values, vec![&json!(0), &json!(1), &json!(3), &json!(2)]);
        assert_ne!(merged.hash(), old.hash());
    }

    #[test]
    fn test_merge_nothing_new() {
        let old = hashed_table(json!({"_data": [{"a": 0}, {"a": 1}]}));
        let new = hashed_table(json!({"_data": [{"a": 1}]}));
        assert!(old.merged_with(&new).is_none());
    }

    #[test]
    fn test_to_value_hash_validates() {
        let table = hashed_table(json!({"_data": [{"a": 1}], "_type": "components"}));
        let value = table.to_value();

        assert_eq!(value["_type"], json!("components"));
        assert_eq!(content_hash(&value), *table.hash());
        assert!(rljson_core::validate_hashes(&value, Default::default()).is_ok());
    }
}
