//! # rljson Testkit
//!
//! Testing utilities for rljson.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known canonical encodings for cross-platform verification
//! - **Generators**: Proptest strategies for table names, nested records,
//!   table sets and linked table pairs
//! - **Fixtures**: Helpers for building linked stores in tests
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the canonical encoding that content hashes are
//! computed over:
//!
//! ```rust
//! use rljson_testkit::vectors::{all_vectors, canonical_hex};
//!
//! for vector in all_vectors() {
//!     assert_eq!(canonical_hex(&vector), vector.canonical_hex, "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use rljson::Store;
//! use rljson_testkit::generators::table_set;
//!
//! proptest! {
//!     #[test]
//!     fn adding_twice_is_adding_once(data in table_set()) {
//!         let once = Store::new().add_data(&data).unwrap();
//!         prop_assert_eq!(once.add_data(&data).unwrap(), once);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up linked tables:
//!
//! ```rust
//! use rljson_testkit::fixtures::StoreFixture;
//! use serde_json::json;
//!
//! let fixture = StoreFixture::new()
//!     .add("tableA", vec![json!({"a": "a0"})])
//!     .add_linked("tableB", "tableA", 0, json!({"b": 1}));
//! assert!(fixture.store().check_links().is_ok());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{example_tables, init_tracing, StoreFixture};
pub use generators::{linked_tables, record, table_name, table_set, value, LinkedTables};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
