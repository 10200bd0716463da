//! Foundation types for certchain.
//!
//! This crate provides the data model shared by every other certchain crate:
//! the certificate [`Record`] staged into the ledger, the sealed [`Block`]
//! that batches records, and the small identifier types that tie them
//! together.
//!
//! # Key Types
//!
//! - [`RecordId`]: Monotonic certificate identifier assigned at staging
//! - [`BlockIndex`]: 1-based position of a block in the chain
//! - [`SealToken`]: Opaque value accepted when sealing a block
//! - [`BlockHash`]: Lowercase hex digest linking blocks together
//! - [`Timestamp`]: UTC wall-clock instant
//! - [`Record`] / [`Attachment`]: One issued certificate and its optional file
//! - [`Block`]: A sealed batch of records plus linkage metadata

pub mod block;
pub mod error;
pub mod hash;
pub mod ids;
pub mod record;
pub mod temporal;

pub use block::Block;
pub use error::TypeError;
pub use hash::BlockHash;
pub use ids::{BlockIndex, RecordId, SealToken};
pub use record::{Attachment, AttachmentKind, Issuance, Record};
pub use temporal::Timestamp;
