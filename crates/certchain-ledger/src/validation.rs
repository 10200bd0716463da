use std::fmt;

use tracing::warn;

use certchain_crypto::block_hash;
use certchain_types::{BlockIndex, RecordId};

use crate::traits::LedgerReader;

/// Result of a full chain audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub block_count: u64,
    pub record_count: u64,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Lowest block index with at least one violation.
    pub fn first_invalid(&self) -> Option<BlockIndex> {
        self.violations.iter().map(|v| v.index).min()
    }
}

/// A specific integrity violation detected during an audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub index: BlockIndex,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// Genesis block differs from the configured sentinel or carries records.
    GenesisMismatch,
    /// Block index does not equal its position in the chain.
    IndexGap,
    /// `previous_hash` does not equal the predecessor's stored hash.
    HashChainBreak,
    /// Stored hash does not match a fresh digest of the block.
    HashMismatch,
    /// Record ids are not strictly increasing along the chain.
    RecordIdOrder,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::GenesisMismatch => "genesis-mismatch",
            Self::IndexGap => "index-gap",
            Self::HashChainBreak => "hash-chain-break",
            Self::HashMismatch => "hash-mismatch",
            Self::RecordIdOrder => "record-id-order",
        };
        f.write_str(s)
    }
}

/// Whole-chain auditor.
///
/// Stricter than `Ledger::validate`: it also checks the genesis block,
/// block positions, and record-id ordering, and it keeps scanning after the
/// first problem.
pub struct ChainAuditor;

impl ChainAuditor {
    pub fn audit<R: LedgerReader + ?Sized>(reader: &R) -> ValidationReport {
        let blocks = reader.blocks();
        let config = reader.config();
        let mut violations = Vec::new();
        let mut last_record_id: Option<RecordId> = None;

        for (offset, block) in blocks.iter().enumerate() {
            let expected_index = BlockIndex::from_offset(offset);
            if block.index != expected_index {
                violations.push(Violation {
                    index: expected_index,
                    kind: ViolationKind::IndexGap,
                    description: format!(
                        "expected index {}, found {}",
                        expected_index.get(),
                        block.index.get()
                    ),
                });
            }

            if offset == 0 {
                if block.previous_hash != config.genesis_previous_hash() || !block.is_empty() {
                    violations.push(Violation {
                        index: expected_index,
                        kind: ViolationKind::GenesisMismatch,
                        description: "genesis block does not match configuration".into(),
                    });
                }
            } else if block.previous_hash != blocks[offset - 1].hash {
                violations.push(Violation {
                    index: expected_index,
                    kind: ViolationKind::HashChainBreak,
                    description: "previous hash link mismatch".into(),
                });
            }

            if block_hash(block) != block.hash {
                violations.push(Violation {
                    index: expected_index,
                    kind: ViolationKind::HashMismatch,
                    description: "stored hash does not match computed".into(),
                });
            }

            for record in &block.records {
                if last_record_id.is_some_and(|last| record.record_id <= last) {
                    violations.push(Violation {
                        index: expected_index,
                        kind: ViolationKind::RecordIdOrder,
                        description: format!("record {} out of order", record.record_id),
                    });
                }
                last_record_id = Some(record.record_id);
            }
        }

        for v in &violations {
            warn!(index = v.index.get(), kind = %v.kind, "{}", v.description);
        }

        ValidationReport {
            block_count: blocks.len() as u64,
            record_count: blocks.iter().map(|b| b.records.len() as u64).sum(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use certchain_types::{BlockHash, Issuance, SealToken};

    use crate::ledger::Ledger;

    use super::*;

    fn ledger_with(blocks: usize) -> Ledger {
        let mut ledger = Ledger::new();
        for i in 0..blocks {
            ledger.stage(Issuance::new(format!("s{i}"), "C", "I", "ID", "D"));
            ledger.stage(Issuance::new(format!("t{i}"), "C", "I", "ID", "D"));
            ledger.seal(SealToken(i as u64));
        }
        ledger
    }

    #[test]
    fn clean_chain_passes() {
        let report = ledger_with(3).audit();
        assert!(report.is_valid());
        assert_eq!(report.block_count, 4);
        assert_eq!(report.record_count, 6);
        assert_eq!(report.first_invalid(), None);
    }

    #[test]
    fn reports_every_violation() {
        let mut ledger = ledger_with(4);
        ledger.chain_mut()[1].records[0].course = "x".into();
        ledger.chain_mut()[3].records[1].issuer = "y".into();

        let report = ledger.audit();
        assert!(!report.is_valid());
        assert_eq!(report.violations.len(), 2);
        assert!(report
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::HashMismatch));
        assert_eq!(report.first_invalid(), Some(BlockIndex(2)));
    }

    #[test]
    fn detects_tampered_genesis() {
        let mut ledger = ledger_with(1);
        ledger.chain_mut()[0].previous_hash = BlockHash::sentinel("1");

        let report = ledger.audit();
        let kinds: Vec<_> = report.violations.iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::GenesisMismatch));
        assert!(kinds.contains(&ViolationKind::HashMismatch));
        // The plain boolean check starts after genesis.
        assert!(ledger.validate());
    }

    #[test]
    fn detects_reordered_record_ids() {
        let mut ledger = ledger_with(1);
        ledger.chain_mut()[1].records.swap(0, 1);
        let report = ledger.audit();
        let kinds: Vec<_> = report.violations.iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::RecordIdOrder));
        assert!(kinds.contains(&ViolationKind::HashMismatch));
    }

    #[test]
    fn detects_index_gap_and_broken_link() {
        let mut ledger = ledger_with(3);
        ledger.chain_mut()[2].index = BlockIndex(7);
        ledger.chain_mut()[3].previous_hash = BlockHash::from_digest(&[0; 32]);
        let report = ledger.audit();
        let kinds: Vec<_> = report.violations.iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::IndexGap));
        assert!(kinds.contains(&ViolationKind::HashChainBreak));
    }

    #[test]
    fn violation_kind_display() {
        assert_eq!(ViolationKind::HashChainBreak.to_string(), "hash-chain-break");
    }
}
