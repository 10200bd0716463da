use certchain_types::{Block, BlockHash};
use sha2::{Digest, Sha256};

use crate::canonical::canonicalize;
use crate::snapshot::BlockSnapshot;

/// Raw SHA-256 of arbitrary bytes.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Canonical byte form of a block's hashed content.
pub fn canonical_bytes(block: &Block) -> Vec<u8> {
    canonicalize(&BlockSnapshot::from(block).to_value()).into_bytes()
}

/// Digest of a block's content, excluding its stored hash and any attachment
/// payloads.
pub fn block_hash(block: &Block) -> BlockHash {
    BlockHash::from_digest(&sha256(&canonical_bytes(block)))
}

/// Returns `true` if the block's stored hash matches its content.
pub fn verify_block(block: &Block) -> bool {
    block_hash(block) == block.hash
}
