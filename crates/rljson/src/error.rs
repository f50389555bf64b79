//! Error types for the store.

use std::fmt;

use rljson_core::{ContentHash, HashError, NameViolation};
use thiserror::Error;

/// A structural or naming problem with one incoming table.
///
/// Validation collects every violation before failing, so callers can fix
/// all offending tables in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableViolation {
    /// The table name breaks the naming rules.
    InvalidName { table: String, reason: NameViolation },
    /// The table has no `_data` field.
    MissingData { table: String },
    /// `_data` is present but not a list.
    WrongDataType { table: String, found: &'static str },
    /// An entry of `_data` is not an object.
    RecordNotObject {
        table: String,
        position: usize,
        found: &'static str,
    },
}

impl TableViolation {
    pub fn table(&self) -> &str {
        match self {
            TableViolation::InvalidName { table, .. }
            | TableViolation::MissingData { table }
            | TableViolation::WrongDataType { table, .. }
            | TableViolation::RecordNotObject { table, .. } => table,
        }
    }
}

impl fmt::Display for TableViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableViolation::InvalidName { table, reason } => {
                write!(f, "invalid table name {table:?}: {reason}")
            }
            TableViolation::MissingData { table } => {
                write!(f, "table {table:?} has no _data field")
            }
            TableViolation::WrongDataType { table, found } => {
                write!(f, "table {table:?}: _data must be a list, found {found}")
            }
            TableViolation::RecordNotObject {
                table,
                position,
                found,
            } => write!(
                f,
                "table {table:?}: _data[{position}] must be an object, found {found}"
            ),
        }
    }
}

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The data passed to `add_data` is not a JSON object.
    #[error("data must be an object of tables, found {found}")]
    NotAnObject { found: &'static str },

    /// One or more incoming tables are malformed or badly named.
    #[error("invalid tables: {}", join(.0))]
    InvalidTables(Vec<TableViolation>),

    /// Content hash validation failed.
    #[error("hash validation failed: {0}")]
    Hash(#[from] HashError),

    /// No table with this name.
    #[error("table {table:?} not found")]
    TableNotFound { table: String },

    /// No record with this hash in the table.
    #[error("item {hash} not found in table {table:?}")]
    ItemNotFound { table: String, hash: String },

    /// The record has no such field.
    #[error("key {key:?} not found in item {hash} of table {table:?}")]
    KeyNotFound {
        table: String,
        hash: ContentHash,
        key: String,
    },

    /// A key follows a field that is not a reference.
    #[error(
        "invalid key {key:?}: field {field:?} of item {hash} in table {table:?} is a value, not a link"
    )]
    InvalidKey {
        table: String,
        hash: ContentHash,
        field: String,
        key: String,
    },

    /// Position past the end of the table.
    #[error("index {index} out of range for table {table:?} of length {len}")]
    IndexOutOfRange {
        table: String,
        index: usize,
        len: usize,
    },

    /// A reference field names a table that does not exist.
    #[error("{table}/{hash}/{field} points to missing table {target_table:?}")]
    DanglingTableRef {
        table: String,
        hash: ContentHash,
        field: String,
        target_table: String,
    },

    /// A reference field holds a hash the target table does not contain.
    #[error("{table}/{hash}/{field} points to missing item {target_hash} of table {target_table:?}")]
    DanglingItemRef {
        table: String,
        hash: ContentHash,
        field: String,
        target_table: String,
        target_hash: String,
    },
}

impl StoreError {
    /// Violations carried by [`StoreError::InvalidTables`], empty otherwise.
    pub fn violations(&self) -> &[TableViolation] {
        match self {
            StoreError::InvalidTables(violations) => violations,
            _ => &[],
        }
    }
}

fn join(violations: &[TableViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
