//! Records: hashed JSON objects stored in tables.

use serde_json::Value;

use crate::error::RecordError;
use crate::hash::ContentHash;
use crate::names::ref_target;
use crate::HASH_KEY;

/// A JSON object together with its content hash.
///
/// The hash is read from the object's `_hash` field and cached, so a
/// record is only built from an object that has been through
/// [`assign_hashes`](crate::assign_hashes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    hash: ContentHash,
    value: Value,
}

impl Record {
    /// Wrap an object that already carries a `_hash` string.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let hash = match &value {
            Value::Object(map) => match map.get(HASH_KEY) {
                Some(Value::String(token)) => ContentHash::new(token.clone()),
                _ => return Err(RecordError::MissingHash),
            },
            other => {
                return Err(RecordError::NotAnObject {
                    found: value_kind(other),
                })
            }
        };
        Ok(Self { hash, value })
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    /// Value of a field, `_hash` included.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.value.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Fields other than `_hash`, in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.value
            .as_object()
            .into_iter()
            .flatten()
            .filter(|(key, _)| key.as_str() != HASH_KEY)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Reference fields as `(field, target table, value)`.
    pub fn ref_fields(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.fields()
            .filter_map(|(field, value)| ref_target(field).map(|target| (field, target, value)))
    }

    /// The whole record, `_hash` included.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Short name of a JSON value's variant, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
