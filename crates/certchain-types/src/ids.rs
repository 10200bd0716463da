use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an issued certificate.
///
/// Assigned by the ledger at staging time. Ids start at 1 and increase by one
/// per staged record; they are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based position of a block in the chain. The genesis block is index 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockIndex(pub u64);

impl BlockIndex {
    pub const GENESIS: Self = Self(1);

    pub fn get(self) -> u64 {
        self.0
    }

    /// Index of the block that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Zero-based offset into a chain vector.
    pub fn offset(self) -> Option<usize> {
        self.0.checked_sub(1).and_then(|o| usize::try_from(o).ok())
    }

    pub fn from_offset(offset: usize) -> Self {
        Self(offset as u64 + 1)
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque value supplied when sealing a block.
///
/// Stands where a proof-of-work nonce would sit in a mined chain, but no work
/// is checked: any value is accepted as-is and it carries no security
/// property beyond being part of the hashed content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SealToken(pub u64);

impl fmt::Display for SealToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
