//! Error types for rljson core.

use std::fmt;

use thiserror::Error;

use crate::hash::ContentHash;

/// Content hash validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("hash mismatch at {path}: expected {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: ContentHash,
        found: String,
    },

    #[error("hash missing at {path}")]
    Missing { path: String },
}

impl HashError {
    /// JSON path of the offending object.
    pub fn path(&self) -> &str {
        match self {
            HashError::Mismatch { path, .. } | HashError::Missing { path } => path,
        }
    }
}

/// Why a table name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameViolation {
    Empty,
    InvalidCharacter(char),
    StartsWithDigit,
    EndsWithRef,
}

impl fmt::Display for NameViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameViolation::Empty => write!(f, "name is empty"),
            NameViolation::InvalidCharacter(c) => {
                write!(f, "only letters and digits are allowed, found {c:?}")
            }
            NameViolation::StartsWithDigit => write!(f, "name must not start with a digit"),
            NameViolation::EndsWithRef => write!(f, "name must not end with \"Ref\""),
        }
    }
}

/// A table name that fails the naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid table name {name:?}: {reason}")]
pub struct NameError {
    pub name: String,
    pub reason: NameViolation,
}

/// A JSON value that cannot be used as a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("record has no {} field", crate::HASH_KEY)]
    MissingHash,
}
