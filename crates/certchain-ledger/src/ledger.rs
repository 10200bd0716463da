use std::mem;

use tracing::{debug, info, warn};

use certchain_crypto::{block_hash, ChainError, HashChainVerifier};
use certchain_types::{
    Attachment, Block, BlockHash, BlockIndex, Issuance, Record, RecordId, SealToken, Timestamp,
};

use crate::config::LedgerConfig;
use crate::projection::{CertificateView, Lookup, ProjectionBuilder, SummaryRow};
use crate::traits::LedgerReader;
use crate::validation::{ChainAuditor, ValidationReport};

/// In-memory, single-writer certificate ledger.
///
/// Holds the chain of sealed blocks (starting with one genesis block), the
/// records staged since the last seal, and the record-id counter. The chain
/// is append-only: blocks are never removed, reordered, or rewritten.
///
/// A `Ledger` is owned by whoever hosts it and mutated through `&mut self`.
/// Hosts that need to share one between threads wrap it in
/// [`SharedLedger`](crate::shared::SharedLedger).
#[derive(Debug)]
pub struct Ledger {
    config: LedgerConfig,
    chain: Vec<Block>,
    pending: Vec<Record>,
    next_record_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create a ledger whose genesis block follows `config`.
    pub fn with_config(config: LedgerConfig) -> Self {
        let genesis = seal_block(
            BlockIndex::GENESIS,
            config.genesis_previous_hash(),
            config.genesis_seal_token(),
            Vec::new(),
        );
        info!(hash = %genesis.hash.short(), "ledger initialized with genesis block");

        Self {
            config,
            chain: vec![genesis],
            pending: Vec::new(),
            next_record_id: 0,
        }
    }

    /// Stage a certificate for the next seal and return its id.
    ///
    /// Fields are stored as given; nothing is validated.
    pub fn stage(&mut self, issuance: Issuance) -> RecordId {
        self.next_record_id += 1;
        let record_id = RecordId(self.next_record_id);
        let record = Record::from_issuance(record_id, Timestamp::now(), issuance);
        self.pending.push(record);
        debug!(%record_id, pending = self.pending.len(), "record staged");
        record_id
    }

    /// Field-by-field form of [`stage`](Self::stage).
    pub fn stage_fields(
        &mut self,
        subject_name: impl Into<String>,
        course: impl Into<String>,
        issuer: impl Into<String>,
        issuer_id: impl Into<String>,
        issue_date: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> RecordId {
        let mut issuance = Issuance::new(subject_name, course, issuer, issuer_id, issue_date);
        issuance.attachment = attachment;
        self.stage(issuance)
    }

    /// Move every pending record into a new block and append it.
    ///
    /// Sealing with nothing pending is allowed and appends an empty block.
    pub fn seal(&mut self, seal_token: SealToken) -> &Block {
        let previous_hash = self.head().hash.clone();
        let index = BlockIndex::from_offset(self.chain.len());
        let records = mem::take(&mut self.pending);

        let block = seal_block(index, previous_hash, seal_token, records);
        info!(
            index = block.index.get(),
            records = block.record_count(),
            hash = %block.hash.short(),
            "block sealed"
        );

        self.chain.push(block);
        self.head()
    }

    /// Sealed certificates whose subject name equals `subject_name`,
    /// ignoring case.
    pub fn lookup(&self, subject_name: &str) -> Lookup<'_> {
        ProjectionBuilder::lookup(self, subject_name)
    }

    /// Lookup hits as certificate views, for display or export.
    pub fn certificates(&self, subject_name: &str) -> Vec<CertificateView<'_>> {
        ProjectionBuilder::certificates(self, subject_name)
    }

    /// `true` iff every block after genesis links to its predecessor and
    /// still matches its stored hash.
    pub fn validate(&self) -> bool {
        self.verify().is_ok()
    }

    /// Like [`validate`](Self::validate) but names the first invalid block.
    pub fn verify(&self) -> Result<(), ChainError> {
        HashChainVerifier::verify_chain(&self.chain).inspect_err(|err| {
            warn!(index = err.index().get(), error = %err, "chain verification failed");
        })
    }

    /// Full scan reporting every violation, not just the first.
    pub fn audit(&self) -> ValidationReport {
        ChainAuditor::audit(self)
    }

    /// Every sealed record as a flat display row.
    pub fn summary(&self) -> Vec<SummaryRow> {
        ProjectionBuilder::summary(self)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Records staged since the last seal, in staging order.
    pub fn pending(&self) -> &[Record] {
        &self.pending
    }

    /// The most recently sealed block.
    pub fn head(&self) -> &Block {
        // The chain always holds at least the genesis block.
        &self.chain[self.chain.len() - 1]
    }

    pub fn block(&self, index: BlockIndex) -> Option<&Block> {
        index.offset().and_then(|offset| self.chain.get(offset))
    }

    /// A sealed record and the block holding it.
    pub fn record(&self, record_id: RecordId) -> Option<(BlockIndex, &Record)> {
        self.chain.iter().find_map(|block| {
            block
                .records
                .iter()
                .find(|r| r.record_id == record_id)
                .map(|r| (block.index, r))
        })
    }

    pub fn block_count(&self) -> usize {
        self.chain.len()
    }

    /// Number of sealed records across the chain.
    pub fn record_count(&self) -> usize {
        self.chain.iter().map(Block::record_count).sum()
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn chain_mut(&mut self) -> &mut Vec<Block> {
        &mut self.chain
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerReader for Ledger {
    fn blocks(&self) -> &[Block] {
        &self.chain
    }

    fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

fn seal_block(
    index: BlockIndex,
    previous_hash: BlockHash,
    seal_token: SealToken,
    records: Vec<Record>,
) -> Block {
    let mut block = Block {
        index,
        created_at: Timestamp::now(),
        records,
        seal_token,
        previous_hash,
        hash: BlockHash::sentinel(""),
    };
    block.hash = block_hash(&block);
    block
}
