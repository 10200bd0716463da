use std::slice;

use serde::{Deserialize, Serialize};

use certchain_types::{Attachment, AttachmentKind, Block, BlockIndex, Record, RecordId};

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// One flattened, display-oriented row per sealed record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub block_index: BlockIndex,
    pub record_id: RecordId,
    pub subject_name: String,
    pub course: String,
    pub issuer: String,
    pub issuer_id: String,
    pub issue_date: String,
    pub issued_at: String,
    pub attachment_name: Option<String>,
}

impl SummaryRow {
    fn new(block_index: BlockIndex, record: &Record, timestamp_format: &str) -> Self {
        Self {
            block_index,
            record_id: record.record_id,
            subject_name: record.subject_name.clone(),
            course: record.course.clone(),
            issuer: record.issuer.clone(),
            issuer_id: record.issuer_id.clone(),
            issue_date: record.issue_date.clone(),
            issued_at: record.issued_at.format(timestamp_format),
            attachment_name: record.attachment_name().map(str::to_string),
        }
    }
}

/// A sealed certificate as found by a lookup, with access to its attachment.
#[derive(Clone, Debug)]
pub struct CertificateView<'a> {
    pub block_index: BlockIndex,
    pub record: &'a Record,
    timestamp_format: &'a str,
}

impl<'a> CertificateView<'a> {
    pub fn attachment(&self) -> Option<&'a Attachment> {
        self.record.attachment.as_ref()
    }

    pub fn attachment_kind(&self) -> Option<AttachmentKind> {
        self.attachment().map(Attachment::kind)
    }

    /// Owned details of this certificate. Never includes attachment bytes.
    pub fn details(&self) -> SummaryRow {
        SummaryRow::new(self.block_index, self.record, self.timestamp_format)
    }

    /// Pretty JSON of [`details`](Self::details), suitable for download.
    pub fn to_json_pretty(&self) -> Result<String, LedgerError> {
        serde_json::to_string_pretty(&self.details())
            .map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Suggested filename for the JSON export.
    pub fn export_filename(&self) -> String {
        format!("certificate_{}.json", self.record.record_id)
    }
}

/// Lazy case-insensitive subject-name search over a chain.
///
/// Yields matches in chain order, then insertion order within each block.
/// Every call to a `lookup` constructor starts a fresh scan.
#[derive(Clone, Debug)]
pub struct Lookup<'a> {
    needle: String,
    blocks: slice::Iter<'a, Block>,
    current: Option<(BlockIndex, slice::Iter<'a, Record>)>,
}

impl<'a> Lookup<'a> {
    pub fn new(blocks: &'a [Block], subject_name: &str) -> Self {
        Self {
            needle: subject_name.to_lowercase(),
            blocks: blocks.iter(),
            current: None,
        }
    }
}

impl<'a> Iterator for Lookup<'a> {
    type Item = (BlockIndex, &'a Record);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((index, records)) = &mut self.current {
                if let Some(record) = records.find(|r| r.subject_matches(&self.needle)) {
                    return Some((*index, record));
                }
            }
            let block = self.blocks.next()?;
            self.current = Some((block.index, block.records.iter()));
        }
    }
}

/// Read-only projections over any [`LedgerReader`].
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    /// Every sealed record as a flat row, chain order then insertion order.
    pub fn summary<R: LedgerReader + ?Sized>(reader: &R) -> Vec<SummaryRow> {
        let format = reader.config().timestamp_format.as_str();
        reader
            .blocks()
            .iter()
            .flat_map(|block| {
                block
                    .records
                    .iter()
                    .map(move |record| SummaryRow::new(block.index, record, format))
            })
            .collect()
    }

    pub fn lookup<'a, R: LedgerReader + ?Sized>(reader: &'a R, subject_name: &str) -> Lookup<'a> {
        Lookup::new(reader.blocks(), subject_name)
    }

    /// Lookup hits wrapped as certificate views.
    pub fn certificates<'a, R: LedgerReader + ?Sized>(
        reader: &'a R,
        subject_name: &str,
    ) -> Vec<CertificateView<'a>> {
        let timestamp_format = reader.config().timestamp_format.as_str();
        Self::lookup(reader, subject_name)
            .map(|(block_index, record)| CertificateView {
                block_index,
                record,
                timestamp_format,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use certchain_types::{Issuance, SealToken, Timestamp};

    use crate::ledger::Ledger;

    use super::*;

    fn issuance(name: &str, course: &str) -> Issuance {
        Issuance::new(name, course, "MIT", "U1", "2024-01-01")
    }

    fn populated() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.stage(issuance("Ada Lovelace", "CS101"));
        ledger.stage(issuance("Alan Turing", "CS102"));
        ledger.seal(SealToken(10));
        ledger.seal(SealToken(11));
        ledger.stage(issuance("ADA LOVELACE", "CS201").with_attachment(Attachment::new(
            "ada.PNG",
            vec![0x89, 0x50, 0x4e, 0x47],
        )));
        ledger.seal(SealToken(12));
        ledger
    }

    #[test]
    fn summary_is_flat_and_ordered() {
        let ledger = populated();
        let rows = ProjectionBuilder::summary(&ledger);
        assert_eq!(rows.len(), 3);
        let ids: Vec<u64> = rows.iter().map(|r| r.record_id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(rows[0].block_index, BlockIndex(2));
        assert_eq!(rows[1].block_index, BlockIndex(2));
        assert_eq!(rows[2].block_index, BlockIndex(4));
        assert_eq!(rows[2].attachment_name.as_deref(), Some("ada.PNG"));
    }

    #[test]
    fn summary_of_fresh_ledger_is_empty() {
        assert!(ProjectionBuilder::summary(&Ledger::new()).is_empty());
    }

    #[test]
    fn summary_formats_timestamp() {
        let mut ledger = populated();
        ledger.chain_mut()[1].records[0].issued_at =
            Timestamp::from_unix_seconds(1_704_067_200);
        let rows = ProjectionBuilder::summary(&ledger);
        assert_eq!(rows[0].issued_at, "2024-01-01 00:00:00");
    }

    #[test]
    fn lookup_spans_blocks_in_order() {
        let ledger = populated();
        let hits: Vec<_> = ProjectionBuilder::lookup(&ledger, "ada lovelace").collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, BlockIndex(2));
        assert_eq!(hits[0].1.course, "CS101");
        assert_eq!(hits[1].0, BlockIndex(4));
        assert_eq!(hits[1].1.course, "CS201");
    }

    #[test]
    fn lookup_is_exact_not_prefix() {
        let ledger = populated();
        assert_eq!(ProjectionBuilder::lookup(&ledger, "ada").count(), 0);
        assert_eq!(ProjectionBuilder::lookup(&ledger, "").count(), 0);
    }

    #[test]
    fn lookup_is_restartable() {
        let ledger = populated();
        let lookup = ProjectionBuilder::lookup(&ledger, "Alan Turing");
        let first: Vec<_> = lookup.clone().map(|(_, r)| r.record_id).collect();
        let second: Vec<_> = lookup.map(|(_, r)| r.record_id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![RecordId(2)]);
    }

    #[test]
    fn certificate_view_exports_details_without_bytes() {
        let ledger = populated();
        let views = ProjectionBuilder::certificates(&ledger, "ada lovelace");
        assert_eq!(views.len(), 2);

        let with_file = &views[1];
        assert_eq!(with_file.attachment_kind(), Some(AttachmentKind::Image));
        assert_eq!(with_file.attachment().map(Attachment::len), Some(4));
        assert_eq!(with_file.export_filename(), "certificate_3.json");

        let json = with_file.to_json_pretty().unwrap();
        let parsed: SummaryRow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, with_file.details());
        assert!(!json.contains("bytes"));

        assert_eq!(views[0].attachment_kind(), None);
    }
}
