//! # rljson
//!
//! An in-memory, immutable relational store over JSON, keyed by content
//! hashes.
//!
//! ## Overview
//!
//! A [`Store`] is a set of named tables. Each table is an ordered list of
//! records, and every record is identified by the content hash of its
//! fields. Tables link to each other through reference fields: a field
//! named `<table>Ref` holds the hash of a record in `<table>`.
//!
//! ## Key Types
//!
//! - [`Store`] - Immutable snapshot of all tables
//! - [`Table`] - Ordered records with their hash index
//! - [`AddOptions`] - Controls hash validation when merging
//! - [`StoreError`] - Everything that can go wrong
//!
//! ## Usage
//!
//! ```rust
//! use rljson::Store;
//! use serde_json::json;
//!
//! let store = Store::new()
//!     .add_data(&json!({
//!         "tableA": {"_data": [{"a": "a0"}, {"a": "a1"}]}
//!     }))
//!     .unwrap();
//!
//! // Adding the same records again changes nothing.
//! let again = store
//!     .add_data(&json!({"tableA": {"_data": [{"a": "a1"}]}}))
//!     .unwrap();
//! assert_eq!(again, store);
//!
//! let a0 = store.hash("tableA", 0).unwrap();
//! assert_eq!(store.get("tableA", a0.as_str(), &["a"]).unwrap(), "a0");
//! ```
//!
//! ## Design Notes
//!
//! - **Immutable snapshots**: every change returns a new store; tables a
//!   merge does not change are shared between snapshots
//! - **Idempotent merges**: records already present by hash are dropped
//! - **Lazy integrity**: references are only checked by
//!   [`Store::check_links`], never while merging

pub mod access;
pub mod error;
pub mod links;
pub mod merge;
pub mod paths;
pub mod store;
pub mod table;

pub use error::{Result, StoreError, TableViolation};
pub use links::{LinkViolation, MissingTarget};
pub use merge::AddOptions;
pub use store::Store;
pub use table::{normalize, Table};

// Re-export commonly used core types
pub use rljson_core::{ContentHash, HashError, HashPolicy, NameViolation, Record};
