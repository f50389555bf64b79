//! # rljson Core
//!
//! Pure primitives for rljson: content hashes, canonical encoding,
//! records, and table naming rules.
//!
//! This crate contains no I/O and no store. It is pure computation over
//! JSON values.
//!
//! ## Key Types
//!
//! - [`ContentHash`] - 22-character content address of a JSON object
//! - [`Record`] - A hashed JSON object living in a table
//! - [`HashPolicy`] - Whether absent hashes fail validation
//!
//! ## Canonicalization
//!
//! Every JSON object is hashed over a deterministic CBOR encoding of its
//! content with the reserved `_hash` key removed. See [`canonical`].

pub mod canonical;
pub mod error;
pub mod hash;
pub mod hasher;
pub mod names;
pub mod record;

pub use canonical::canonical_bytes;
pub use error::{HashError, NameError, NameViolation, RecordError};
pub use hash::ContentHash;
pub use hasher::{assign_hashes, content_hash, validate_hashes, HashPolicy};
pub use names::{ref_target, validate_table_name, validate_table_names};
pub use record::{value_kind, Record};

/// Reserved key holding the content hash of an object.
pub const HASH_KEY: &str = "_hash";

/// Reserved key holding the ordered records of a table.
pub const DATA_KEY: &str = "_data";

/// Suffix marking a field as a reference into another table.
pub const REF_SUFFIX: &str = "Ref";
