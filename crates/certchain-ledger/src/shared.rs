use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use certchain_types::{BlockHash, BlockIndex, Issuance, RecordId, SealToken};

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::projection::SummaryRow;

/// Outcome of a batch issuance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedBlock {
    pub index: BlockIndex,
    pub hash: BlockHash,
    pub record_ids: Vec<RecordId>,
}

/// A [`Ledger`] behind a single lock, for hosts with more than one writer.
///
/// [`issue`](Self::issue) stages a batch and seals it under one write guard,
/// so no other writer can stage into, or seal, the same pending set halfway
/// through.
#[derive(Debug, Default)]
pub struct SharedLedger {
    inner: RwLock<Ledger>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: RwLock::new(ledger),
        }
    }

    /// Stage every issuance in `batch` and seal them into one block.
    pub fn issue(
        &self,
        batch: Vec<Issuance>,
        seal_token: SealToken,
    ) -> Result<IssuedBlock, LedgerError> {
        let mut ledger = self.write()?;
        let record_ids: Vec<RecordId> = batch.into_iter().map(|i| ledger.stage(i)).collect();
        let block = ledger.seal(seal_token);
        debug!(index = block.index.get(), count = record_ids.len(), "batch issued");
        Ok(IssuedBlock {
            index: block.index,
            hash: block.hash.clone(),
            record_ids,
        })
    }

    /// Run a read-only closure against the ledger.
    pub fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> Result<T, LedgerError> {
        Ok(f(&*self.read_guard()?))
    }

    pub fn validate(&self) -> Result<bool, LedgerError> {
        self.read(Ledger::validate)
    }

    pub fn summary(&self) -> Result<Vec<SummaryRow>, LedgerError> {
        self.read(Ledger::summary)
    }

    /// Take the ledger back out of the lock.
    pub fn into_inner(self) -> Result<Ledger, LedgerError> {
        self.inner.into_inner().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Ledger>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }
}
