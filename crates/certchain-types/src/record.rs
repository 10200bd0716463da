use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::RecordId;
use crate::temporal::Timestamp;

/// Binary file attached to a certificate record, plus its filename.
///
/// The payload is opaque to the ledger: it is never interpreted and never
/// hashed. Only the filename takes part in block hashing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Coarse classification of an attachment by filename extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// `.jpg`, `.jpeg` or `.png`: can be previewed inline.
    Image,
    /// `.pdf`: offered as a download.
    Pdf,
    Other,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Classify by extension, case-insensitively.
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_filename(&self.filename)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AttachmentKind {
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if [".jpg", ".jpeg", ".png"].iter().any(|ext| lower.ends_with(ext)) {
            Self::Image
        } else if lower.ends_with(".pdf") {
            Self::Pdf
        } else {
            Self::Other
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attachment({}, {} bytes)", self.filename, self.bytes.len())
    }
}

/// Business fields of a certificate about to be staged.
///
/// None of the fields are validated by the ledger; presence checks belong to
/// whatever collects the input.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Issuance {
    pub subject_name: String,
    pub course: String,
    pub issuer: String,
    pub issuer_id: String,
    pub issue_date: String,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

impl Issuance {
    pub fn new(
        subject_name: impl Into<String>,
        course: impl Into<String>,
        issuer: impl Into<String>,
        issuer_id: impl Into<String>,
        issue_date: impl Into<String>,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            course: course.into(),
            issuer: issuer.into(),
            issuer_id: issuer_id.into(),
            issue_date: issue_date.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// One issued certificate as held by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub record_id: RecordId,
    pub subject_name: String,
    pub course: String,
    pub issuer: String,
    pub issuer_id: String,
    pub issue_date: String,
    pub issued_at: Timestamp,
    pub attachment: Option<Attachment>,
}

impl Record {
    /// Bind an issuance to its assigned id and staging time.
    pub fn from_issuance(record_id: RecordId, issued_at: Timestamp, issuance: Issuance) -> Self {
        let Issuance {
            subject_name,
            course,
            issuer,
            issuer_id,
            issue_date,
            attachment,
        } = issuance;
        Self {
            record_id,
            subject_name,
            course,
            issuer,
            issuer_id,
            issue_date,
            issued_at,
            attachment,
        }
    }

    /// Case-insensitive exact comparison against the subject name.
    pub fn subject_matches(&self, lowered_name: &str) -> bool {
        self.subject_name.to_lowercase() == lowered_name
    }

    pub fn attachment_name(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.filename.as_str())
    }
}
