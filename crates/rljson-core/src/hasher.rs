//! Assigning and validating content hashes.
//!
//! Every JSON object in a table set (records, nested objects, tables and
//! the root) carries a `_hash` field holding the [`ContentHash`] of its
//! canonical content.

use serde_json::Value;

use crate::canonical::canonical_bytes;
use crate::error::HashError;
use crate::hash::ContentHash;
use crate::HASH_KEY;

/// How validation treats objects without a `_hash` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashPolicy {
    /// Every object must carry a hash.
    #[default]
    RequirePresent,
    /// Objects without a hash are skipped; present hashes must still match.
    IgnoreMissing,
}

/// Compute the content hash of a JSON value.
///
/// Existing `_hash` fields anywhere in the value do not contribute.
pub fn content_hash(value: &Value) -> ContentHash {
    ContentHash::digest(&canonical_bytes(value))
}

/// Return a copy of `value` in which every object carries its content hash.
///
/// Existing hashes are replaced by the recomputed ones, so applying this
/// twice yields the same value as applying it once.
pub fn assign_hashes(value: &Value) -> Value {
    let mut hashed = value.clone();
    assign_in_place(&mut hashed);
    hashed
}

fn assign_in_place(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key != HASH_KEY {
                    assign_in_place(child);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                assign_in_place(item);
            }
            return;
        }
        _ => return,
    }

    let hash = content_hash(value);
    if let Value::Object(map) = value {
        map.insert(HASH_KEY.to_string(), hash.into());
    }
}

/// Recompute every hash in `value` and compare with the stored ones.
///
/// Fails with the JSON path of the first offending object, children
/// before parents.
pub fn validate_hashes(value: &Value, policy: HashPolicy) -> Result<(), HashError> {
    let mut path = String::new();
    validate_at(value, &mut path, policy)
}

fn validate_at(value: &Value, path: &mut String, policy: HashPolicy) -> Result<(), HashError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == HASH_KEY {
                    continue;
                }
                let len = path.len();
                path.push('/');
                path.push_str(key);
                validate_at(child, path, policy)?;
                path.truncate(len);
            }

            match map.get(HASH_KEY) {
                Some(Value::String(found)) => {
                    let expected = content_hash(value);
                    if expected.as_str() != found {
                        return Err(HashError::Mismatch {
                            path: display_path(path),
                            expected,
                            found: found.clone(),
                        });
                    }
                }
                Some(other) => {
                    return Err(HashError::Mismatch {
                        path: display_path(path),
                        expected: content_hash(value),
                        found: other.to_string(),
                    });
                }
                None if policy == HashPolicy::RequirePresent => {
                    return Err(HashError::Missing {
                        path: display_path(path),
                    });
                }
                None => {}
            }
            Ok(())
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let len = path.len();
                path.push('/');
                path.push_str(&i.to_string());
                validate_at(item, path, policy)?;
                path.truncate(len);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
