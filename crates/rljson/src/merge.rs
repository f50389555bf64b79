//! Merging new data into a store.
//!
//! Merging only appends. Records already present (by content hash) are
//! dropped and new ones keep their arrival order, so adding the same data
//! twice gives the same store as adding it once.

use std::sync::Arc;

use rljson_core::{
    assign_hashes, validate_hashes, validate_table_names, value_kind, HashPolicy, HASH_KEY,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, StoreError, TableViolation};
use crate::store::Store;
use crate::table::{check_structure, normalize};

/// Options for [`Store::add_data_with`].
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Check the hashes carried by the incoming data before merging.
    pub validate_hashes_first: bool,
    /// How validation treats objects without a hash.
    pub hash_policy: HashPolicy,
}

impl AddOptions {
    /// Options that validate incoming hashes, requiring every object to
    /// carry one.
    pub fn validated() -> Self {
        Self {
            validate_hashes_first: true,
            hash_policy: HashPolicy::RequirePresent,
        }
    }

    pub fn hash_policy(mut self, policy: HashPolicy) -> Self {
        self.hash_policy = policy;
        self
    }
}

impl Store {
    /// Merge `data` into a new store with default options.
    pub fn add_data(&self, data: &Value) -> Result<Store> {
        self.add_data_with(data, &AddOptions::default())
    }

    /// Merge `data` into a new store.
    ///
    /// `data` maps table names to `{"_data": [records...]}`. Fails without
    /// producing anything if any table is malformed or badly named (all
    /// offenders are reported together), or if hash validation is requested
    /// and fails.
    pub fn add_data_with(&self, data: &Value, options: &AddOptions) -> Result<Store> {
        let Value::Object(incoming) = data else {
            warn!(found = value_kind(data), "rejected data: not an object");
            return Err(StoreError::NotAnObject {
                found: value_kind(data),
            });
        };

        let violations = check_tables(incoming);
        if !violations.is_empty() {
            warn!(count = violations.len(), "rejected data: invalid tables");
            return Err(StoreError::InvalidTables(violations));
        }

        if options.validate_hashes_first {
            if let Err(e) = validate_hashes(data, options.hash_policy) {
                warn!(path = e.path(), "rejected data: hash validation failed");
                return Err(e.into());
            }
        }

        let hashed = assign_hashes(data);

        let mut tables = self.tables.clone();
        let mut created = 0usize;
        let mut extended = 0usize;
        let mut unchanged = 0usize;

        for (name, value) in hashed.as_object().into_iter().flatten() {
            if name == HASH_KEY {
                continue;
            }

            let table = normalize(name, value)?;
            match self.tables.get(name.as_str()) {
                None => {
                    created += 1;
                    tables.insert(name.clone(), Arc::new(table));
                }
                Some(existing) => match existing.merged_with(&table) {
                    Some(merged) => {
                        debug!(
                            table = %name,
                            added = merged.len() - existing.len(),
                            dropped = table.len() - (merged.len() - existing.len()),
                            "extending table"
                        );
                        extended += 1;
                        tables.insert(name.clone(), Arc::new(merged));
                    }
                    None => unchanged += 1,
                },
            }
        }

        debug!(created, extended, unchanged, tables = tables.len(), "merged data");
        Ok(Store { tables })
    }
}

/// Collect naming and structural violations of every incoming table.
fn check_tables(incoming: &Map<String, Value>) -> Vec<TableViolation> {
    let mut violations = Vec::new();

    if let Err(errors) = validate_table_names(incoming.keys().map(String::as_str)) {
        violations.extend(errors.into_iter().map(|e| TableViolation::InvalidName {
            table: e.name,
            reason: e.reason,
        }));
    }

    for (name, value) in incoming {
        if name != HASH_KEY {
            check_structure(name, value, &mut violations);
        }
    }

    violations
}
