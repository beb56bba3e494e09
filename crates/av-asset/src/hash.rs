//! Content fingerprints
//!
//! A [`ContentHash`] is the Blake3 digest of a value's JSON encoding. Stores
//! use it to tell whether two runs left an asset with the same field values.

use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Blake3 digest of serialized asset content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Fingerprint `value`, streaming its JSON encoding into the hasher
    ///
    /// # Errors
    /// Returns error if `value` cannot be encoded
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, HashError> {
        let mut hasher = blake3::Hasher::new();
        serde_json::to_writer(&mut hasher, value)?;
        Ok(Self(*hasher.finalize().as_bytes()))
    }

    #[inline]
    #[must_use]
    pub const fn digest(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 8 bytes as hex, for log lines
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Fingerprinting failure
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("cannot encode content for hashing: {0}")]
    Encoding(#[from] serde_json::Error),
}
