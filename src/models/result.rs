//! Probe result data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of probing one site for one username.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryStatus {
    /// Account exists
    Claimed,
    /// Account does not exist
    Available,
    /// Probe failed or was inconclusive
    Unknown,
    /// Username violates the site's naming rule
    Illegal,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Claimed => "CLAIMED",
            Self::Available => "AVAILABLE",
            Self::Unknown => "UNKNOWN",
            Self::Illegal => "ILLEGAL",
        };
        f.write_str(name)
    }
}

/// Result of one site probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub site_name: String,

    /// Site homepage
    pub main_url: String,

    /// Resolved profile URL (empty when rejected before resolution)
    pub profile_url: String,

    pub status: QueryStatus,

    /// Observed HTTP status code (empty when no response was obtained)
    pub http_status_code: String,
}

impl ProbeResult {
    /// Result for a probe that never reached the network.
    pub fn unresolved(
        site_name: impl Into<String>,
        main_url: impl Into<String>,
        status: QueryStatus,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            main_url: main_url.into(),
            profile_url: String::new(),
            status,
            http_status_code: String::new(),
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.status == QueryStatus::Claimed
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = if self.profile_url.is_empty() {
            &self.main_url
        } else {
            &self.profile_url
        };
        write!(f, "[{}] {}: {}", self.status, self.site_name, url)
    }
}
