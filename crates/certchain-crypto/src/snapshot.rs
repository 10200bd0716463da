use certchain_types::{Block, Record};
use serde_json::{json, Value};

/// Borrowed, hash-ready view of a block.
///
/// Carries every block field except the stored `hash`. Building a snapshot
/// never copies attachment payloads and never touches the block itself.
#[derive(Debug)]
pub struct BlockSnapshot<'a> {
    pub index: u64,
    pub created_at: String,
    pub records: Vec<RecordSnapshot<'a>>,
    pub seal_token: u64,
    pub previous_hash: &'a str,
}

/// Borrowed view of a record: all fields, attachment reduced to its filename.
#[derive(Debug)]
pub struct RecordSnapshot<'a> {
    pub record_id: u64,
    pub subject_name: &'a str,
    pub course: &'a str,
    pub issuer: &'a str,
    pub issuer_id: &'a str,
    pub issue_date: &'a str,
    pub issued_at: String,
    pub attachment_name: Option<&'a str>,
}

impl BlockSnapshot<'_> {
    pub fn to_value(&self) -> Value {
        json!({
            "index": self.index,
            "created_at": self.created_at,
            "records": self.records.iter().map(RecordSnapshot::to_value).collect::<Vec<_>>(),
            "seal_token": self.seal_token,
            "previous_hash": self.previous_hash,
        })
    }
}

impl RecordSnapshot<'_> {
    pub fn to_value(&self) -> Value {
        json!({
            "record_id": self.record_id,
            "subject_name": self.subject_name,
            "course": self.course,
            "issuer": self.issuer,
            "issuer_id": self.issuer_id,
            "issue_date": self.issue_date,
            "issued_at": self.issued_at,
            "attachment_name": self.attachment_name,
        })
    }
}

impl<'a> From<&'a Block> for BlockSnapshot<'a> {
    fn from(block: &'a Block) -> Self {
        Self {
            index: block.index.get(),
            created_at: block.created_at.to_canonical_string(),
            records: block.records.iter().map(RecordSnapshot::from).collect(),
            seal_token: block.seal_token.0,
            previous_hash: block.previous_hash.as_str(),
        }
    }
}

impl<'a> From<&'a Record> for RecordSnapshot<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            record_id: record.record_id.get(),
            subject_name: &record.subject_name,
            course: &record.course,
            issuer: &record.issuer,
            issuer_id: &record.issuer_id,
            issue_date: &record.issue_date,
            issued_at: record.issued_at.to_canonical_string(),
            attachment_name: record.attachment_name(),
        }
    }
}
