//! Proptest generators for property-based testing.

use proptest::prelude::*;
use proptest::sample::Index;
use rljson::Store;
use serde_json::{Map, Value};

/// Generate a valid table name.
pub fn table_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,11}".prop_filter("reserved suffix", |n| !n.ends_with("Ref"))
}

/// Generate a table name the validator must reject.
pub fn invalid_table_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9][a-zA-Z0-9]{0,8}",
        "[a-zA-Z][a-zA-Z0-9]{0,8}Ref",
        "[a-zA-Z]{1,4}[-_ .][a-zA-Z]{0,4}",
    ]
}

/// Generate a field name that is never read as a reference.
pub fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,7}".prop_filter("reference suffix", |n| !n.ends_with("Ref"))
}

/// Generate a scalar JSON value.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::String),
    ]
}

/// Generate any JSON value, nesting objects and arrays a few levels deep.
pub fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(field_name(), inner, 0..4)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}

/// Generate a record without references.
pub fn record() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(field_name(), value(), 0..5)
        .prop_map(|fields| Value::Object(fields.into_iter().collect()))
}

/// Generate the `_data` list of one table. May contain duplicates.
pub fn table_data() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(record(), 0..8)
}

/// Generate a table set accepted by `Store::add_data`.
pub fn table_set() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(table_name(), table_data(), 1..4).prop_map(|tables| {
        let mut root = Map::new();
        for (name, records) in tables {
            let mut table = Map::new();
            table.insert("_data".to_string(), Value::Array(records));
            root.insert(name, Value::Object(table));
        }
        Value::Object(root)
    })
}

/// Two tables where every record of `linker` points into `target`.
#[derive(Debug, Clone)]
pub struct LinkedTables {
    pub target: String,
    pub targets: Vec<Value>,
    pub linker: String,
    /// Each link picks its target record by position and carries extra fields.
    pub links: Vec<(Index, Value)>,
}

impl LinkedTables {
    /// Name of the reference field in `linker` records.
    pub fn ref_field(&self) -> String {
        format!("{}Ref", self.target)
    }

    /// Merge `targets` into `store`, then the linking records with their
    /// references resolved against the merged target table.
    pub fn merge_into(&self, store: &Store) -> Store {
        let mut data = Map::new();
        data.insert(self.target.clone(), table_value(self.targets.clone()));
        let store = store
            .add_data(&Value::Object(data))
            .unwrap_or_else(|e| panic!("target table rejected: {e}"));

        let target = store
            .table(&self.target)
            .unwrap_or_else(|e| panic!("target table missing: {e}"));
        let records = self
            .links
            .iter()
            .map(|(index, fields)| {
                let hash = target.records()[index.index(target.len())].hash();
                let mut fields = fields.clone();
                if let Value::Object(map) = &mut fields {
                    map.insert(self.ref_field(), Value::from(hash.clone()));
                }
                fields
            })
            .collect();

        let mut data = Map::new();
        data.insert(self.linker.clone(), table_value(records));
        store
            .add_data(&Value::Object(data))
            .unwrap_or_else(|e| panic!("linking table rejected: {e}"))
    }
}

fn table_value(records: Vec<Value>) -> Value {
    let mut table = Map::new();
    table.insert("_data".to_string(), Value::Array(records));
    Value::Object(table)
}

/// Generate a pair of linked tables with distinct names.
pub fn linked_tables() -> impl Strategy<Value = LinkedTables> {
    (
        (table_name(), table_name()).prop_filter("distinct tables", |(a, b)| a != b),
        prop::collection::vec(record(), 1..6),
        prop::collection::vec((any::<Index>(), record()), 1..6),
    )
        .prop_map(|((target, linker), targets, links)| LinkedTables {
            target,
            targets,
            linker,
            links,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rljson::{MissingTarget, StoreError};
    use rljson_core::{
        content_hash, validate_hashes, validate_table_name, ContentHash, HashPolicy, HASH_KEY,
    };
    use std::collections::HashSet;

    /// Hashes of a table's incoming records, first occurrence only.
    fn unique_hashes(records: &[Value]) -> Vec<ContentHash> {
        let mut seen = HashSet::new();
        records
            .iter()
            .map(content_hash)
            .filter(|h| seen.insert(h.clone()))
            .collect()
    }

    fn data_of<'a>(set: &'a Value, table: &str) -> &'a [Value] {
        set[table]["_data"].as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop `_hash` at every depth.
    fn strip_hashes(value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .filter(|(key, _)| key.as_str() != HASH_KEY)
                    .map(|(key, child)| (key.clone(), strip_hashes(child)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(strip_hashes).collect()),
            other => other.clone(),
        }
    }

    fn stored_hashes(store: &Store, table: &str) -> Vec<ContentHash> {
        store
            .table(table)
            .map(|t| t.records().iter().map(|r| r.hash().clone()).collect())
            .unwrap_or_default()
    }

    proptest! {
        #[test]
        fn test_valid_names_accepted(name in table_name()) {
            prop_assert!(validate_table_name(&name).is_ok());
        }

        #[test]
        fn test_invalid_names_rejected(name in invalid_table_name()) {
            prop_assert!(validate_table_name(&name).is_err());
        }

        #[test]
        fn test_add_is_idempotent(base in table_set(), data in table_set()) {
            let store = Store::new().add_data(&base).unwrap();

            let once = store.add_data(&data).unwrap();
            let twice = once.add_data(&data).unwrap();

            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.ls(), twice.ls());
        }

        #[test]
        fn test_merge_preserves_order(base in table_set(), data in table_set()) {
            let store = Store::new().add_data(&base).unwrap();
            let merged = store.add_data(&data).unwrap();

            for name in merged.table_names() {
                let mut expected = stored_hashes(&store, name);
                for hash in unique_hashes(data_of(&data, name)) {
                    if !expected.contains(&hash) {
                        expected.push(hash);
                    }
                }
                prop_assert_eq!(stored_hashes(&merged, name), expected);
            }
        }

        #[test]
        fn test_original_store_untouched(base in table_set(), data in table_set()) {
            let store = Store::new().add_data(&base).unwrap();
            let before = store.to_value();

            let _merged = store.add_data(&data).unwrap();

            prop_assert_eq!(store.to_value(), before);
        }

        #[test]
        fn test_hash_independent_of_history(first in table_set(), data in table_set()) {
            let direct = Store::new().add_data(&data).unwrap();
            let via = Store::new()
                .add_data(&first)
                .unwrap()
                .add_data(&data)
                .unwrap();

            for name in direct.table_names() {
                for record in direct.table(name).unwrap().records() {
                    let hash = record.hash().as_str();
                    prop_assert_eq!(
                        via.item(name, hash).unwrap().as_value(),
                        record.as_value()
                    );
                }
            }
        }

        #[test]
        fn test_item_round_trip(data in table_set()) {
            let store = Store::new().add_data(&data).unwrap();

            for name in store.table_names() {
                let records = data_of(&data, name);
                let unique = unique_hashes(records);
                prop_assert_eq!(store.table(name).unwrap().len(), unique.len());

                for (i, expected) in unique.iter().enumerate() {
                    let hash = store.hash(name, i).unwrap();
                    prop_assert_eq!(hash, expected);

                    let original = records
                        .iter()
                        .find(|r| &content_hash(r) == expected)
                        .unwrap();
                    let content = strip_hashes(store.item(name, hash.as_str()).unwrap().as_value());
                    prop_assert_eq!(&content, original);
                }
            }
        }

        #[test]
        fn test_export_reloads_equal(data in table_set()) {
            let store = Store::new().add_data(&data).unwrap();
            let reloaded = Store::new().add_data(&store.to_value()).unwrap();
            prop_assert_eq!(reloaded, store);
        }

        #[test]
        fn test_ls_counts_fields(data in table_set()) {
            let store = Store::new().add_data(&data).unwrap();
            let fields: usize = store
                .tables()
                .flat_map(|(_, t)| t.records())
                .map(|r| r.fields().count())
                .sum();

            prop_assert_eq!(store.ls().len(), fields);
            prop_assert!(store.check_links().is_ok());
        }

        #[test]
        fn test_nested_objects_carry_hashes(data in table_set()) {
            let exported = Store::new().add_data(&data).unwrap().to_value();
            prop_assert!(validate_hashes(&exported, HashPolicy::RequirePresent).is_ok());
        }

        #[test]
        fn test_resolved_links_pass(linked in linked_tables()) {
            let store = linked.merge_into(&Store::new());
            let field = linked.ref_field();

            prop_assert!(store.check_links().is_ok());
            prop_assert!(store.broken_links().is_empty());

            for record in store.table(&linked.linker).unwrap().records() {
                let target = store
                    .get(&linked.linker, record.hash().as_str(), &[field.as_str()])
                    .unwrap();
                prop_assert_eq!(&target[HASH_KEY], &record.as_value()[field.as_str()]);
            }
        }

        #[test]
        fn test_changed_reference_reported_once(linked in linked_tables(), pick in any::<Index>()) {
            let store = linked.merge_into(&Store::new());
            let field = linked.ref_field();

            let records = store.table(&linked.linker).unwrap().records();
            let mut changed = strip_hashes(records[pick.index(records.len())].as_value());
            changed[field.as_str()] = Value::from("missing");

            let mut data = Map::new();
            data.insert(linked.linker.clone(), table_value(vec![changed]));
            let store = store.add_data(&Value::Object(data)).unwrap();

            prop_assert_eq!(store.broken_links().len(), 1);
            match store.check_links() {
                Err(StoreError::DanglingItemRef { table, field: found, target_table, target_hash, .. }) => {
                    prop_assert_eq!(table, linked.linker.clone());
                    prop_assert_eq!(found, field);
                    prop_assert_eq!(target_table, linked.target.clone());
                    prop_assert_eq!(target_hash, "missing");
                }
                other => prop_assert!(false, "expected DanglingItemRef, got {:?}", other),
            }
        }

        #[test]
        fn test_removed_target_breaks_its_links(linked in linked_tables(), pick in any::<Index>()) {
            let store = linked.merge_into(&Store::new());
            let field = linked.ref_field();

            let target = store.table(&linked.target).unwrap();
            let removed = target.records()[pick.index(target.len())].hash().as_str().to_string();
            let expected = store
                .table(&linked.linker)
                .unwrap()
                .records()
                .iter()
                .filter(|r| r.get(&field) == Some(&Value::from(removed.as_str())))
                .count();

            let mut exported = store.to_value();
            exported[linked.target.as_str()]["_data"]
                .as_array_mut()
                .unwrap()
                .retain(|r| r[HASH_KEY] != removed.as_str());
            let reloaded = Store::new().add_data(&exported).unwrap();

            let broken = reloaded.broken_links();
            prop_assert_eq!(broken.len(), expected);
            for violation in &broken {
                prop_assert_eq!(violation.missing, MissingTarget::Item);
                prop_assert_eq!(&violation.target_hash, &removed);
            }
            prop_assert_eq!(reloaded.check_links().is_ok(), expected == 0);
        }
    }
}
