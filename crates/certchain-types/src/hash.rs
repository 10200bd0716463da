use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Digest that links a block to its predecessor.
///
/// Normally the lowercase hex form of a 32-byte SHA-256 digest. The genesis
/// block's `previous_hash` is the one exception: it holds a fixed sentinel
/// (by default `"0"`) because there is no prior block to point at.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHash(String);

impl BlockHash {
    /// Default previous-hash value of the genesis block.
    pub const GENESIS_SENTINEL: &'static str = "0";

    /// Build from a raw 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Wrap an arbitrary sentinel string without validation.
    pub fn sentinel(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse a 64-character hex digest. Uppercase input is normalized.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        Ok(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 characters, for logs and terminal output.
    pub fn short(&self) -> &str {
        self.0
            .char_indices()
            .nth(12)
            .map_or(&self.0[..], |(end, _)| &self.0[..end])
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.short())
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlockHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
