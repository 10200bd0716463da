//! Hashing primitives for certchain.
//!
//! Provides canonical JSON encoding, SHA-256 block hashing over a borrowed
//! snapshot of a block, and hash chain verification.
//!
//! The block digest covers every block field except the stored `hash`
//! itself, and every record field except the attachment payload. Attachment
//! filenames are covered.

pub mod canonical;
pub mod chain;
pub mod hasher;
pub mod snapshot;

pub use canonical::canonicalize;
pub use chain::{ChainError, HashChainVerifier};
pub use hasher::{block_hash, canonical_bytes, sha256, verify_block};
pub use snapshot::{BlockSnapshot, RecordSnapshot};
