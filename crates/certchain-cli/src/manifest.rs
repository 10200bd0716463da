use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use certchain_ledger::Ledger;
use certchain_types::{Attachment, Issuance, SealToken};

/// Issuance manifest: blocks to seal, in order, each with its records.
///
/// ```toml
/// [[block]]
/// seal_token = 1
///
/// [[block.record]]
/// subject_name = "Ada Lovelace"
/// course = "CS101"
/// issuer = "MIT"
/// issuer_id = "U1"
/// issue_date = "2024-01-01"
/// attachment = "files/ada.pdf"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "block")]
    pub blocks: Vec<BlockEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BlockEntry {
    pub seal_token: u64,
    #[serde(default, rename = "record")]
    pub records: Vec<RecordEntry>,
}

/// Missing business fields become empty strings; the ledger stores them as
/// given.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecordEntry {
    pub subject_name: String,
    pub course: String,
    pub issuer: String,
    pub issuer_id: String,
    pub issue_date: String,
    /// Path to the attachment, relative to the manifest file.
    pub attachment: Option<PathBuf>,
}

impl Manifest {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("malformed manifest")
    }

    /// Load a manifest and return it with the directory attachments resolve
    /// against.
    pub fn load(path: &Path) -> anyhow::Result<(Self, PathBuf)> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let manifest = Self::from_toml_str(&text)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok((manifest, base))
    }

    /// Stage and seal every block into `ledger`.
    pub fn replay(&self, base: &Path, ledger: &mut Ledger) -> anyhow::Result<()> {
        for entry in &self.blocks {
            // Read every attachment before staging so a failure leaves
            // nothing pending.
            let batch = entry
                .records
                .iter()
                .map(|record| record.to_issuance(base))
                .collect::<anyhow::Result<Vec<_>>>()?;
            for issuance in batch {
                ledger.stage(issuance);
            }
            ledger.seal(SealToken(entry.seal_token));
        }
        debug!(blocks = self.blocks.len(), "manifest replayed");
        Ok(())
    }
}

impl RecordEntry {
    fn to_issuance(&self, base: &Path) -> anyhow::Result<Issuance> {
        let mut issuance = Issuance::new(
            self.subject_name.as_str(),
            self.course.as_str(),
            self.issuer.as_str(),
            self.issuer_id.as_str(),
            self.issue_date.as_str(),
        );
        if let Some(rel) = &self.attachment {
            let path = base.join(rel);
            let bytes = fs::read(&path)
                .with_context(|| format!("reading attachment {}", path.display()))?;
            let filename = rel
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| rel.display().to_string());
            issuance = issuance.with_attachment(Attachment::new(filename, bytes));
        }
        Ok(issuance)
    }
}
