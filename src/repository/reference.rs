//! Repository reference classification

use crate::config::CloneConfig;
use crate::error::CloneError;
use crate::repository::url::parse_remote_url;
use crate::utils::path::expand_tilde;
use anyhow::Result;
use core::fmt;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

/// `user@host:path` references
static SCP_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+:").expect("scp pattern is valid"));

/// A repository on the hosting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub owner: String,
    pub name: String,
    /// URL as provided by the user
    pub raw_url: String,
}

impl RemoteRepository {
    /// `owner/name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Where a clone reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryReference {
    /// Repository on the hosting service, fetched as an archive
    Remote(RemoteRepository),
    /// Local filesystem path, copied recursively
    Local {
        /// Path with `file:` prefixes removed and `~` expanded, not yet resolved
        source_path: PathBuf,
    },
}

impl RepositoryReference {
    /// Classify raw user input
    ///
    /// No network or disk access happens here; local paths are validated
    /// when the clone runs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input is empty
    /// - The input is a URL that cannot be parsed, uses a scheme other than
    ///   http(s), or names a host that is not configured
    /// - The input is an scp-style SSH reference
    /// - A hosting-service URL lacks owner and repository segments
    pub fn classify(input: &str, config: &CloneConfig) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(
                CloneError::invalid_reference(input, "source must not be empty").into(),
            );
        }

        // Support both file:// and file: formats
        if let Some(path) = trimmed
            .strip_prefix("file://")
            .or_else(|| trimmed.strip_prefix("file:"))
        {
            if path.is_empty() {
                return Err(CloneError::invalid_reference(input, "file path is empty").into());
            }
            return Ok(Self::Local {
                source_path: expand_tilde(path),
            });
        }

        if trimmed.contains("://") {
            return classify_url(trimmed, config);
        }

        if SCP_LIKE.is_match(trimmed) {
            return Err(CloneError::invalid_reference(
                input,
                "SSH references are not supported; use an https URL",
            )
            .into());
        }

        Ok(Self::Local {
            source_path: expand_tilde(trimmed),
        })
    }

    /// Check if this is a hosting-service repository
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Check if this is a local filesystem source
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }
}

fn classify_url(input: &str, config: &CloneConfig) -> Result<RepositoryReference> {
    let url = Url::parse(input).map_err(|e| {
        return CloneError::invalid_reference(input, format!("not a valid URL ({e})"));
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CloneError::invalid_reference(
            input,
            format!("unsupported scheme '{}'", url.scheme()),
        )
        .into());
    }

    let host = url.host_str().unwrap_or_default();
    if !config.is_known_host(host) {
        return Err(CloneError::invalid_reference(
            input,
            format!(
                "unsupported host '{host}' (supported: {})",
                config.hosts.join(", ")
            ),
        )
        .into());
    }

    let (owner, name) = parse_remote_url(&url)?;
    Ok(RepositoryReference::Remote(RemoteRepository {
        owner,
        name,
        raw_url: input.to_owned(),
    }))
}
