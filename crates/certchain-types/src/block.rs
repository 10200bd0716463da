use serde::{Deserialize, Serialize};

use crate::hash::BlockHash;
use crate::ids::{BlockIndex, SealToken};
use crate::record::Record;
use crate::temporal::Timestamp;

/// A sealed batch of certificate records plus its linkage metadata.
///
/// `hash` is computed once when the block is sealed and never recomputed or
/// rewritten afterwards. Any later difference between `hash` and a fresh
/// digest of the block's content means the block was tampered with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: BlockIndex,
    pub created_at: Timestamp,
    pub records: Vec<Record>,
    pub seal_token: SealToken,
    pub previous_hash: BlockHash,
    pub hash: BlockHash,
}

impl Block {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
