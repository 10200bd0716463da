use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// UTC wall-clock instant.
///
/// Captured when a record is staged and when a block is sealed. Successive
/// values are non-decreasing in practice but two records staged within the
/// same clock tick may share a timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp for the current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from whole seconds since the UNIX epoch.
    /// Out-of-range values clamp to the epoch.
    pub fn from_unix_seconds(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    /// Lossless RFC 3339 form used as hash input.
    pub fn to_canonical_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Render with a `strftime`-style pattern.
    pub fn format(&self, pattern: &str) -> String {
        self.0.format(pattern).to_string()
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.to_canonical_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}
