//! Content hash type.
//!
//! A [`ContentHash`] is the identity of a JSON object: the first 128 bits
//! of `Blake3(HASH_DOMAIN || canonical_bytes(object))`, encoded as
//! unpadded base64url. The token is always 22 characters.

use std::borrow::Borrow;
use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Domain separation prefix for content hashes.
pub const HASH_DOMAIN: &[u8] = b"rljson/content-hash/v1";

/// Number of digest bytes kept in a content hash.
pub const HASH_BYTES: usize = 16;

/// Length of the printable token.
pub const HASH_LEN: usize = 22;

/// A content-addressed identifier.
///
/// The store treats the token as opaque: hashes read back from incoming
/// data are accepted as they are, and only [`ContentHash::digest`]
/// produces new ones.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Digest canonical bytes into a content hash.
    pub fn digest(canonical: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(HASH_DOMAIN);
        hasher.update(canonical);
        let digest = hasher.finalize();
        Self(URL_SAFE_NO_PAD.encode(&digest.as_bytes()[..HASH_BYTES]))
    }

    /// Wrap an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token has the shape produced by [`ContentHash::digest`].
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == HASH_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContentHash {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for ContentHash {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for ContentHash {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<ContentHash> for serde_json::Value {
    fn from(hash: ContentHash) -> Self {
        serde_json::Value::String(hash.0)
    }
}
