//! The store: an immutable snapshot of named tables.

use std::sync::Arc;

use im::OrdMap;
use rljson_core::{content_hash, HASH_KEY};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::table::Table;

/// An immutable set of named tables.
///
/// A `Store` is never modified in place. [`Store::add_data`] returns a new
/// store and leaves the receiver untouched. Tables a merge does not change
/// are shared between the old and the new snapshot, so cloning a store and
/// adding data costs in proportion to the tables touched.
///
/// Tables are kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub(crate) tables: OrdMap<String, Arc<Table>>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Tables with their names, sorted by name.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables
            .iter()
            .map(|(name, table)| (name.as_str(), table.as_ref()))
    }

    /// The canonical form of the whole store.
    ///
    /// Every table carries its `_hash` and the root carries the hash of
    /// the whole set, so the result passes hash validation and can be fed
    /// back into [`Store::add_data`].
    pub fn to_value(&self) -> Value {
        let mut root: Map<String, Value> = self
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), table.to_value()))
            .collect();

        let hash = content_hash(&Value::Object(root.clone()));
        root.insert(HASH_KEY.to_string(), hash.into());
        Value::Object(root)
    }

    /// Whether two stores share the same allocation for a table.
    pub fn shares_table(&self, other: &Store, name: &str) -> bool {
        match (self.tables.get(name), other.tables.get(name)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Store {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
