//! Default-branch resolution and candidate ordering

use crate::config::CloneConfig;
use crate::transport::{Transport, TransportError};
use core::fmt;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Repository metadata, only the default branch is read
#[derive(Deserialize, Debug)]
struct RepoInfo {
    default_branch: Option<String>,
}

/// Why the default branch could not be resolved
///
/// Never surfaced to the user; the resolver falls back to the fixed set.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolveFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("metadata request returned HTTP {status}")]
    Status { status: u16 },

    #[error("metadata response is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),

    #[error("metadata response has no default branch")]
    MissingBranch,
}

/// Ordered, de-duplicated branch names to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCandidates(Vec<String>);

impl BranchCandidates {
    /// Branch names in priority order
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over branch names in priority order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BranchCandidates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Build the candidate list: resolved branch first, then the fallbacks
///
/// Duplicates are removed keeping the first occurrence, and blank names are
/// skipped.
#[must_use]
pub fn build_candidates<S: AsRef<str>>(resolved: Option<&str>, fallbacks: &[S]) -> BranchCandidates {
    let mut candidates: Vec<String> = Vec::with_capacity(fallbacks.len() + 1);

    for name in resolved.into_iter().chain(fallbacks.iter().map(AsRef::<str>::as_ref)) {
        let name = name.trim();
        if !name.is_empty() && !candidates.iter().any(|c| c == name) {
            candidates.push(name.to_owned());
        }
    }

    BranchCandidates(candidates)
}

/// Queries repository metadata for the default branch
pub struct BranchResolver<'src> {
    transport: &'src dyn Transport,
    config: &'src CloneConfig,
}

impl<'src> BranchResolver<'src> {
    #[must_use]
    pub const fn new(transport: &'src dyn Transport, config: &'src CloneConfig) -> Self {
        Self { transport, config }
    }

    /// Ask the metadata endpoint for the repository's default branch
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveFailure`] on transport errors, timeouts, non-success
    /// statuses, malformed bodies or a missing/blank `default_branch`.
    pub fn resolve_default_branch(&self, owner: &str, name: &str) -> Result<String, ResolveFailure> {
        let url = self.config.metadata_url(owner, name);
        debug!("Fetching repository metadata from: {url}");

        let response = self.transport.get(&url, self.config.metadata_timeout)?;
        if !response.is_success() {
            return Err(ResolveFailure::Status {
                status: response.status,
            });
        }

        let info: RepoInfo = serde_json::from_slice(&response.body)?;
        match info.default_branch {
            Some(branch) if !branch.trim().is_empty() => Ok(branch.trim().to_owned()),
            _ => Err(ResolveFailure::MissingBranch),
        }
    }

    /// Candidate branches for a repository
    ///
    /// Resolution failures are logged and the fixed fallback set is used on
    /// its own.
    #[must_use]
    pub fn candidates(&self, owner: &str, name: &str) -> BranchCandidates {
        let resolved = match self.resolve_default_branch(owner, name) {
            Ok(branch) => {
                debug!("Default branch for {owner}/{name}: {branch}");
                Some(branch)
            }
            Err(err) => {
                warn!("Could not determine default branch ({err}), trying fallback branches");
                None
            }
        };

        let candidates = build_candidates(resolved.as_deref(), &self.config.fallback_branches);
        debug!("Branch candidates: {candidates}");
        candidates
    }
}
