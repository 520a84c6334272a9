//! Clone operation coordination

use crate::config::CloneConfig;
use crate::error::CloneError;
use crate::operations::copy::clone_local;
use crate::operations::guard::{check_destination, prepare_destination};
use crate::remote::{ArchiveFetcher, ArchiveInstaller, BranchResolver};
use crate::repository::{RemoteRepository, RepositoryReference};
use crate::transport::Transport;
use crate::utils::path::absolutize;
use anyhow::{Context as _, Result};
use core::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What to clone and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    /// Remote repository URL or local directory path
    pub source: String,
    /// Destination directory; derived from the source name when absent
    pub destination: Option<PathBuf>,
}

impl CloneRequest {
    #[must_use]
    pub fn new<S: Into<String>>(source: S, destination: Option<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination,
        }
    }
}

/// Result of a successful clone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Remote {
        repository: RemoteRepository,
        branch: String,
        destination: PathBuf,
        files: usize,
    },
    Local {
        source: PathBuf,
        destination: PathBuf,
        files: usize,
    },
}

impl CloneOutcome {
    /// Final destination directory
    #[must_use]
    pub fn destination(&self) -> &Path {
        match self {
            Self::Remote { destination, .. } | Self::Local { destination, .. } => destination,
        }
    }

    /// Number of files written to the destination
    #[must_use]
    pub const fn files(&self) -> usize {
        match *self {
            Self::Remote { files, .. } | Self::Local { files, .. } => files,
        }
    }
}

impl fmt::Display for CloneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote {
                repository,
                branch,
                destination,
                files,
            } => write!(
                f,
                "Cloned {repository} (branch: {branch}) into '{}' ({files} files)",
                destination.display()
            ),
            Self::Local {
                source,
                destination,
                files,
            } => write!(
                f,
                "Cloned local directory '{}' into '{}' ({files} files)",
                source.display(),
                destination.display()
            ),
        }
    }
}

/// Coordinates one clone from reference to materialized directory
#[non_exhaustive]
pub struct CloneOperation<'src> {
    config: CloneConfig,
    transport: &'src dyn Transport,
    working_dir: PathBuf,
    installer: ArchiveInstaller,
}

impl<'src> CloneOperation<'src> {
    /// Create a new clone operation
    ///
    /// Relative paths are resolved against the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The current directory cannot be determined
    #[inline]
    pub fn new(config: CloneConfig, transport: &'src dyn Transport) -> Result<Self> {
        config.validate()?;
        let working_dir = std::env::current_dir().map_err(|e| {
            return CloneError::filesystem(format!("Cannot get current directory: {e}"));
        })?;

        Ok(Self {
            config,
            transport,
            working_dir,
            installer: ArchiveInstaller::new(),
        })
    }

    /// Resolve relative paths against `dir` instead of the process working directory
    #[must_use]
    pub fn with_working_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_dir = absolutize(dir.as_ref(), &self.working_dir);
        self
    }

    /// Use a specific archive installer
    #[must_use]
    pub fn with_installer(mut self, installer: ArchiveInstaller) -> Self {
        self.installer = installer;
        self
    }

    /// Execute the clone
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is unusable, the destination is
    /// occupied or overlaps the source, no archive can be downloaded, the
    /// archive is malformed, or a filesystem operation fails.
    #[inline]
    pub fn execute(&self, request: &CloneRequest) -> Result<CloneOutcome> {
        let reference = RepositoryReference::classify(&request.source, &self.config)?;
        debug!("Classified source: {reference:?}");

        let result = match reference {
            RepositoryReference::Remote(repository) => {
                self.clone_remote(repository, request.destination.as_deref())
            }
            RepositoryReference::Local { source_path } => {
                self.clone_local_directory(&source_path, request.destination.as_deref())
            }
        };
        result.map_err(into_clone_error)
    }

    fn clone_remote(
        &self,
        repository: RemoteRepository,
        destination: Option<&Path>,
    ) -> Result<CloneOutcome> {
        let destination = self.resolve_destination(destination, &repository.name);
        info!("Cloning into '{}'...", destination.display());

        // Fail before any request is made
        check_destination(&destination)?;

        info!("Fetching repository information for {repository}...");
        let candidates = BranchResolver::new(self.transport, &self.config)
            .candidates(&repository.owner, &repository.name);

        let archive =
            ArchiveFetcher::new(self.transport, &self.config).fetch(&repository, &candidates)?;

        info!("Extracting archive...");
        prepare_destination(&destination)?;
        let files = self.installer.install(&archive.bytes, &destination)?;

        Ok(CloneOutcome::Remote {
            repository,
            branch: archive.branch,
            destination,
            files,
        })
    }

    fn clone_local_directory(
        &self,
        source_path: &Path,
        destination: Option<&Path>,
    ) -> Result<CloneOutcome> {
        let source = absolutize(source_path, &self.working_dir);
        let destination = match destination {
            Some(path) => absolutize(path, &self.working_dir),
            None => self.working_dir.join(local_directory_name(&source)?),
        };
        info!("Cloning local directory into '{}'...", destination.display());

        let files = clone_local(&source, &destination)?;
        let source = source
            .canonicalize()
            .with_context(|| format!("Failed to resolve source path: {}", source.display()))?;

        Ok(CloneOutcome::Local {
            source,
            destination,
            files,
        })
    }

    fn resolve_destination(&self, destination: Option<&Path>, default_name: &str) -> PathBuf {
        match destination {
            Some(path) => absolutize(path, &self.working_dir),
            None => self.working_dir.join(default_name),
        }
    }
}

/// Report uncategorized I/O failures as filesystem errors
///
/// Only the outermost context reaches the message; the full chain is logged
/// at debug level.
fn into_clone_error(err: anyhow::Error) -> anyhow::Error {
    if err.downcast_ref::<CloneError>().is_some() {
        return err;
    }
    debug!("Filesystem failure: {err:#}");
    CloneError::filesystem(err.to_string()).into()
}

/// Directory name a local clone defaults to
fn local_directory_name(source: &Path) -> Result<PathBuf> {
    let resolved = source.canonicalize().unwrap_or_else(|_| source.to_path_buf());
    resolved
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| {
            CloneError::invalid_destination(
                source,
                "cannot derive a destination name from the source; pass a destination",
            )
            .into()
        })
}
