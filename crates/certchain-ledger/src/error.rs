/// Errors produced by ledger operations.
///
/// None of the core operations (stage, seal, lookup, validate, summary) fail
/// on well-typed input; these cover configuration, export, and the shared
/// wrapper's lock.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid ledger configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}
