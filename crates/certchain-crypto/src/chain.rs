use certchain_types::{Block, BlockIndex};

use crate::hasher::block_hash;

/// Hash chain integrity verifier.
///
/// Verifies that a sequence of blocks forms a valid hash chain: each block
/// after the first links to its predecessor's stored hash, and its stored
/// hash matches a fresh digest of its content. The first block is the
/// anchor and is taken as given.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain, stopping at the first invalid block.
    pub fn verify_chain(blocks: &[Block]) -> Result<(), ChainError> {
        for pair in blocks.windows(2) {
            let (prev, block) = (&pair[0], &pair[1]);

            if block.previous_hash != prev.hash {
                return Err(ChainError::BrokenLink { index: block.index });
            }

            if block_hash(block) != block.hash {
                return Err(ChainError::HashMismatch { index: block.index });
            }
        }
        Ok(())
    }

    /// Boolean form of [`verify_chain`](Self::verify_chain).
    pub fn is_valid(blocks: &[Block]) -> bool {
        Self::verify_chain(blocks).is_ok()
    }
}

/// Errors from chain verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("broken link at block {index}: previous_hash does not match predecessor")]
    BrokenLink { index: BlockIndex },

    #[error("hash mismatch at block {index}: computed hash differs from stored")]
    HashMismatch { index: BlockIndex },
}

impl ChainError {
    /// The first block found to be invalid.
    pub fn index(&self) -> BlockIndex {
        match self {
            Self::BrokenLink { index } | Self::HashMismatch { index } => *index,
        }
    }
}
