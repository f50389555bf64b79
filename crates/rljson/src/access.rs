//! Reading tables, items and values, including chained lookups across
//! reference fields.

use rljson_core::{ref_target, ContentHash, Record};
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::table::Table;

impl Store {
    /// The table called `name`.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .map(|table| table.as_ref())
            .ok_or_else(|| StoreError::TableNotFound {
                table: name.to_string(),
            })
    }

    /// Records of `name` matching `predicate`, in insertion order.
    pub fn items<P>(&self, name: &str, mut predicate: P) -> Result<Vec<&Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        Ok(self
            .table(name)?
            .records()
            .iter()
            .filter(|record| predicate(*record))
            .collect())
    }

    /// The record with content hash `hash` in table `name`.
    pub fn item(&self, name: &str, hash: &str) -> Result<&Record> {
        self.table(name)?
            .get(hash)
            .ok_or_else(|| StoreError::ItemNotFound {
                table: name.to_string(),
                hash: hash.to_string(),
            })
    }

    /// Hash of the record at `index` in the insertion order of `name`.
    pub fn hash(&self, name: &str, index: usize) -> Result<&ContentHash> {
        let table = self.table(name)?;
        table
            .hash_at(index)
            .ok_or_else(|| StoreError::IndexOutOfRange {
                table: name.to_string(),
                index,
                len: table.len(),
            })
    }

    /// Resolve `keys` starting at record `hash` of `table`.
    ///
    /// With no keys the whole record is returned. A plain field yields its
    /// value and must be the last key. A reference field (`<target>Ref`)
    /// jumps to the referenced record of table `<target>` and resolution
    /// continues there with the remaining keys; a reference field given
    /// as the last key yields the referenced record.
    ///
    /// ```
    /// use rljson::Store;
    /// use serde_json::json;
    ///
    /// let store = Store::new()
    ///     .add_data(&json!({"tableA": {"_data": [{"a": "a0"}]}}))
    ///     .unwrap();
    /// let a0 = store.hash("tableA", 0).unwrap().clone();
    /// let store = store
    ///     .add_data(&json!({"tableB": {"_data": [{"tableARef": a0.as_str()}]}}))
    ///     .unwrap();
    /// let b0 = store.hash("tableB", 0).unwrap().clone();
    ///
    /// let value = store.get("tableB", b0.as_str(), &["tableARef", "a"]).unwrap();
    /// assert_eq!(value, &json!("a0"));
    /// ```
    pub fn get(&self, table: &str, hash: &str, keys: &[&str]) -> Result<&Value> {
        let mut table = table;
        let mut record = self.item(table, hash)?;
        let mut remaining = keys;

        while let Some((&key, rest)) = remaining.split_first() {
            let value = record.get(key).ok_or_else(|| StoreError::KeyNotFound {
                table: table.to_string(),
                hash: record.hash().clone(),
                key: key.to_string(),
            })?;

            let Some(target) = ref_target(key) else {
                if let Some(&next) = rest.first() {
                    return Err(StoreError::InvalidKey {
                        table: table.to_string(),
                        hash: record.hash().clone(),
                        field: key.to_string(),
                        key: next.to_string(),
                    });
                }
                return Ok(value);
            };

            let target_hash = match value {
                Value::String(hash) => hash.as_str(),
                other => {
                    return Err(StoreError::ItemNotFound {
                        table: target.to_string(),
                        hash: other.to_string(),
                    })
                }
            };

            record = self.item(target, target_hash)?;
            table = target;
            remaining = rest;
        }

        Ok(record.as_value())
    }
}
