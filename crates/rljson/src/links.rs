//! Referential integrity: every reference field must resolve.
//!
//! Merging never checks links, since a reference may point at a record
//! that only arrives in a later merge. The audit here runs on demand.

use rljson_core::ContentHash;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::Store;

/// What a dangling reference fails to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingTarget {
    Table,
    Item,
}

/// A reference field that does not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkViolation {
    /// Table holding the reference.
    pub table: String,
    /// Record holding the reference.
    pub hash: ContentHash,
    pub field: String,
    pub target_table: String,
    pub target_hash: String,
    pub missing: MissingTarget,
}

impl From<LinkViolation> for StoreError {
    fn from(v: LinkViolation) -> Self {
        match v.missing {
            MissingTarget::Table => StoreError::DanglingTableRef {
                table: v.table,
                hash: v.hash,
                field: v.field,
                target_table: v.target_table,
            },
            MissingTarget::Item => StoreError::DanglingItemRef {
                table: v.table,
                hash: v.hash,
                field: v.field,
                target_table: v.target_table,
                target_hash: v.target_hash,
            },
        }
    }
}

impl Store {
    /// Fail on the first reference that does not resolve.
    ///
    /// Tables are visited in name order, records in insertion order.
    pub fn check_links(&self) -> Result<()> {
        match self.scan_links(true).into_iter().next() {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }

    /// Every reference that does not resolve.
    pub fn broken_links(&self) -> Vec<LinkViolation> {
        self.scan_links(false)
    }

    fn scan_links(&self, stop_at_first: bool) -> Vec<LinkViolation> {
        let mut violations = Vec::new();
        let mut checked = 0usize;

        for (name, table) in self.tables() {
            for record in table.records() {
                for (field, target_table, value) in record.ref_fields() {
                    checked += 1;

                    let target_hash = match value {
                        Value::String(hash) => hash.clone(),
                        other => other.to_string(),
                    };

                    let missing = match self.tables.get(target_table) {
                        None => Some(MissingTarget::Table),
                        Some(target) if !target.contains(&target_hash) => {
                            Some(MissingTarget::Item)
                        }
                        Some(_) => None,
                    };

                    if let Some(missing) = missing {
                        violations.push(LinkViolation {
                            table: name.to_string(),
                            hash: record.hash().clone(),
                            field: field.to_string(),
                            target_table: target_table.to_string(),
                            target_hash,
                            missing,
                        });
                        if stop_at_first {
                            return violations;
                        }
                    }
                }
            }
        }

        debug!(checked, broken = violations.len(), "checked links");
        violations
    }
}
