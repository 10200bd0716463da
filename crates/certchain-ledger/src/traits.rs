use certchain_types::Block;

use crate::config::LedgerConfig;

/// Read boundary for query views and audits.
///
/// Everything read-only in this crate (summary rows, lookups, certificate
/// views, audit reports) is built against this trait rather than a concrete
/// ledger.
pub trait LedgerReader {
    /// The full chain, genesis first.
    fn blocks(&self) -> &[Block];

    fn config(&self) -> &LedgerConfig;
}
