//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical encoding that content hashes are
//! computed over, so any other implementation can check its bytes against
//! them before comparing hashes.

use rljson_core::hash::HASH_LEN;
use rljson_core::{canonical_bytes, content_hash};
use serde_json::Value;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input document as JSON text.
    pub json: &'static str,
    /// Expected canonical encoding (hex).
    pub canonical_hex: &'static str,
}

impl GoldenVector {
    /// Parse the input document.
    pub fn value(&self) -> Value {
        serde_json::from_str(self.json)
            .unwrap_or_else(|e| panic!("vector '{}' is not valid JSON: {e}", self.name))
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty object",
            json: r#"{}"#,
            canonical_hex: "a0",
        },
        GoldenVector {
            name: "single string field",
            json: r#"{"a":"a0"}"#,
            canonical_hex: "a16161626130",
        },
        GoldenVector {
            name: "hash field is ignored",
            json: r#"{"a":"a0","_hash":"anything"}"#,
            canonical_hex: "a16161626130",
        },
        GoldenVector {
            // Shorter encoded keys sort first.
            name: "keys sorted by encoding",
            json: r#"{"b":1,"aa":2}"#,
            canonical_hex: "a261620162616102",
        },
        GoldenVector {
            name: "nested object with null",
            json: r#"{"x":{"y":null}}"#,
            canonical_hex: "a16178a16179f6",
        },
        GoldenVector {
            name: "nested hash field is ignored",
            json: r#"{"x":{"y":null,"_hash":"stale"}}"#,
            canonical_hex: "a16178a16179f6",
        },
        GoldenVector {
            name: "mixed array",
            json: r#"{"l":[1,-1,true,"s"]}"#,
            canonical_hex: "a1616c840120f56173",
        },
        GoldenVector {
            name: "float",
            json: r#"{"f":0.5}"#,
            canonical_hex: "a16166fb3fe0000000000000",
        },
        GoldenVector {
            name: "one-byte integer",
            json: r#"{"n":24}"#,
            canonical_hex: "a1616e1818",
        },
    ]
}

/// Canonical encoding of a vector's input, as hex.
pub fn canonical_hex(vector: &GoldenVector) -> String {
    hex::encode(canonical_bytes(&vector.value()))
}

/// Verify all golden vectors against their expected encodings.
///
/// Returns `(name, matches, actual_hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hex = canonical_hex(v);
            (v.name.to_string(), hex == v.canonical_hex, hex)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, hex) in verify_all_vectors() {
            assert!(matches, "Vector '{name}' encoded as {hex}");
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            let h1 = content_hash(&vector.value());
            let h2 = content_hash(&vector.value());

            assert_eq!(h1, h2, "Vector '{}' hashed differently", vector.name);
            assert_eq!(h1.as_str().len(), HASH_LEN);
            assert!(h1.is_well_formed());
        }
    }

    #[test]
    fn test_equal_encodings_equal_hashes() {
        let vectors = all_vectors();
        for a in &vectors {
            for b in &vectors {
                let same_bytes = a.canonical_hex == b.canonical_hex;
                let same_hash = content_hash(&a.value()) == content_hash(&b.value());
                assert_eq!(same_bytes, same_hash, "'{}' vs '{}'", a.name, b.name);
            }
        }
    }
}
