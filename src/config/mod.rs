//! Configuration module
//!
//! Hosting-service endpoints, request policy and branch fallback settings

pub mod validation;

use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Conventional default-branch names, tried in this order after the resolved one
pub const FALLBACK_BRANCHES: [&str; 2] = ["main", "master"];

/// Hosts recognized as the hosting service
pub const DEFAULT_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

/// Repository metadata API base URL
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Packaged snapshot base URL
pub const DEFAULT_ARCHIVE_BASE: &str = "https://codeload.github.com";

/// Default timeout for the metadata request, in seconds
pub const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 10;

/// Default timeout for each archive download, in seconds
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Settings for one clone invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloneConfig {
    /// Hosts whose URLs are treated as remote repositories
    pub hosts: Vec<String>,
    /// Base URL of the repository metadata endpoint
    pub api_base: String,
    /// Base URL of the packaged snapshot endpoint
    pub archive_base: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    #[serde(with = "duration_secs")]
    pub metadata_timeout: Duration,
    #[serde(with = "duration_secs")]
    pub download_timeout: Duration,
    /// Branch names appended after the resolved default branch
    pub fallback_branches: Vec<String>,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_HOSTS.iter().map(|&h| h.to_owned()).collect(),
            api_base: DEFAULT_API_BASE.to_owned(),
            archive_base: DEFAULT_ARCHIVE_BASE.to_owned(),
            user_agent: default_user_agent(),
            metadata_timeout: Duration::from_secs(DEFAULT_METADATA_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            fallback_branches: FALLBACK_BRANCHES.iter().map(|&b| b.to_owned()).collect(),
        }
    }
}

impl CloneConfig {
    /// Check whether `host` belongs to the configured hosting service
    #[must_use]
    pub fn is_known_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h.eq_ignore_ascii_case(host))
    }

    /// Metadata endpoint for a repository
    #[must_use]
    pub fn metadata_url(&self, owner: &str, name: &str) -> String {
        format!(
            "{}/repos/{owner}/{name}",
            self.api_base.trim_end_matches('/')
        )
    }

    /// Packaged snapshot endpoint for one branch of a repository
    #[must_use]
    pub fn archive_url(&self, owner: &str, name: &str, branch: &str) -> String {
        format!(
            "{}/{owner}/{name}/zip/refs/heads/{branch}",
            self.archive_base.trim_end_matches('/')
        )
    }
}

fn default_user_agent() -> String {
    return format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

/// Serialize `Duration` values as whole seconds
mod duration_secs {
    use core::time::Duration;
    use serde::{Deserialize as _, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
