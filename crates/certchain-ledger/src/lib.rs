//! Append-only certificate ledger for certchain.
//!
//! This crate is the heart of certchain. It provides:
//! - `Ledger`: staging, sealing, and the hash-linked chain of blocks
//! - Lazy case-insensitive lookup and flat summary projections
//! - Boolean validation, first-failure verification, and full audits
//! - `SharedLedger` for hosts that share one ledger between threads
//! - `LedgerConfig` for genesis and display settings

pub mod config;
pub mod error;
pub mod ledger;
pub mod projection;
pub mod shared;
pub mod traits;
pub mod validation;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use ledger::Ledger;
pub use projection::{CertificateView, Lookup, ProjectionBuilder, SummaryRow};
pub use shared::{IssuedBlock, SharedLedger};
pub use traits::LedgerReader;
pub use validation::{ChainAuditor, ValidationReport, Violation, ViolationKind};

pub use certchain_crypto::ChainError;
