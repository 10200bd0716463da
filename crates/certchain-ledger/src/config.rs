use serde::{Deserialize, Serialize};

use certchain_types::{BlockHash, SealToken};

use crate::error::LedgerError;

/// Ledger construction settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Seal token stored in the genesis block.
    pub genesis_seal_token: u64,
    /// Previous-hash sentinel stored in the genesis block.
    pub genesis_previous_hash: String,
    /// `strftime` pattern for timestamps in summary rows and certificate views.
    pub timestamp_format: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_seal_token: 1,
            genesis_previous_hash: BlockHash::GENESIS_SENTINEL.to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Parse from TOML. Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Self =
            toml::from_str(s).map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.timestamp_format.trim().is_empty() {
            return Err(LedgerError::InvalidConfig(
                "timestamp_format must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn genesis_seal_token(&self) -> SealToken {
        SealToken(self.genesis_seal_token)
    }

    pub fn genesis_previous_hash(&self) -> BlockHash {
        BlockHash::sentinel(self.genesis_previous_hash.clone())
    }
}
