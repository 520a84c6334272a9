//! Archive download over the branch candidate list

use crate::config::CloneConfig;
use crate::error::CloneError;
use crate::remote::branch::BranchCandidates;
use crate::repository::RemoteRepository;
use crate::transport::Transport;
use anyhow::Result;
use tracing::{debug, info};

/// A downloaded snapshot and the branch it came from
#[derive(Debug, Clone)]
pub struct FetchedArchive {
    pub branch: String,
    pub bytes: Vec<u8>,
}

/// Downloads packaged snapshots, trying branch candidates in order
pub struct ArchiveFetcher<'src> {
    transport: &'src dyn Transport,
    config: &'src CloneConfig,
}

impl<'src> ArchiveFetcher<'src> {
    #[must_use]
    pub const fn new(transport: &'src dyn Transport, config: &'src CloneConfig) -> Self {
        Self { transport, config }
    }

    /// Download the archive for the first candidate that succeeds
    ///
    /// Only a 2xx status counts as a hit. Other statuses and transport errors
    /// move on to the next candidate; nothing is tried after the first hit.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveNotFound` naming every attempted branch when all
    /// candidates miss.
    pub fn fetch(
        &self,
        repository: &RemoteRepository,
        candidates: &BranchCandidates,
    ) -> Result<FetchedArchive> {
        for branch in candidates.iter() {
            let url = self
                .config
                .archive_url(&repository.owner, &repository.name, branch);
            info!("Downloading {repository} (branch: {branch})...");
            debug!("Archive URL: {url}");

            match self.transport.get(&url, self.config.download_timeout) {
                Ok(response) if response.is_success() => {
                    debug!("Downloaded {} bytes", response.body.len());
                    return Ok(FetchedArchive {
                        branch: branch.to_owned(),
                        bytes: response.body,
                    });
                }
                Ok(response) => {
                    debug!("Branch '{branch}' unavailable: HTTP {}", response.status);
                }
                Err(err) => {
                    debug!("Branch '{branch}' unavailable: {err}");
                }
            }
        }

        Err(CloneError::ArchiveNotFound {
            repository: repository.full_name(),
            branches: candidates.to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::branch::build_candidates;
    use crate::transport::MockTransport;

    fn repository() -> RemoteRepository {
        RemoteRepository {
            owner: "octo".to_owned(),
            name: "demo".to_owned(),
            raw_url: "https://github.com/octo/demo".to_owned(),
        }
    }

    fn archive_url(branch: &str) -> String {
        CloneConfig::default().archive_url("octo", "demo", branch)
    }

    #[test]
    fn test_stops_at_first_success() {
        let transport = MockTransport::new()
            .with_response(&archive_url("a"), 404, b"")
            .with_response(&archive_url("b"), 200, b"archive-b")
            .with_response(&archive_url("c"), 200, b"archive-c");
        let config = CloneConfig::default();
        let fetcher = ArchiveFetcher::new(&transport, &config);

        let fetched = fetcher
            .fetch(&repository(), &build_candidates(None, &["a", "b", "c"]))
            .unwrap();

        assert_eq!(fetched.branch, "b");
        assert_eq!(fetched.bytes, b"archive-b");
        assert_eq!(transport.requests(), vec![archive_url("a"), archive_url("b")]);
    }

    #[test]
    fn test_transport_errors_are_misses() {
        let transport = MockTransport::new()
            .with_timeout(&archive_url("main"))
            .with_response(&archive_url("master"), 200, b"zip");
        let config = CloneConfig::default();
        let fetcher = ArchiveFetcher::new(&transport, &config);

        let fetched = fetcher
            .fetch(&repository(), &build_candidates(None, &["main", "master"]))
            .unwrap();
        assert_eq!(fetched.branch, "master");
    }

    #[test]
    fn test_exhaustion_names_all_branches() {
        let transport = MockTransport::new()
            .with_response(&archive_url("main"), 500, b"")
            .with_failure(&archive_url("master"), "connection reset");
        let config = CloneConfig::default();
        let fetcher = ArchiveFetcher::new(&transport, &config);

        let err = fetcher
            .fetch(&repository(), &build_candidates(None, &["main", "master"]))
            .unwrap_err();

        match err.downcast_ref::<CloneError>() {
            Some(CloneError::ArchiveNotFound {
                repository,
                branches,
            }) => {
                assert_eq!(repository, "octo/demo");
                assert_eq!(branches, "main, master");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_uses_download_timeout() {
        let transport = MockTransport::new().with_response(&archive_url("main"), 200, b"zip");
        let config = CloneConfig::default();
        let fetcher = ArchiveFetcher::new(&transport, &config);

        fetcher
            .fetch(&repository(), &build_candidates(None, &["main"]))
            .unwrap();
        assert_eq!(transport.recorded()[0].timeout, config.download_timeout);
    }
}
