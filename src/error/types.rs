//! Custom error types with exit codes

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for snapclone operations
///
/// Every variant renders as a single templated line. The offending input is
/// interpolated, internal details are not.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CloneError {
    /// The source string cannot be used as a repository reference
    #[error("Invalid repository reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// A hosting-service URL without owner and repository segments
    #[error(
        "Malformed repository URL '{url}': expected <scheme>://<host>/<owner>/<repository>"
    )]
    MalformedUrl { url: String },

    /// Configuration Error - invalid configuration values
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Local source path does not exist
    #[error("Source path '{}' does not exist", .path.display())]
    SourceNotFound { path: PathBuf },

    /// Local source path is not a directory
    #[error("Source path '{}' is not a directory", .path.display())]
    InvalidSource { path: PathBuf },

    /// Destination overlaps the local source
    #[error("Invalid destination '{}': {reason}", .path.display())]
    InvalidDestination { path: PathBuf, reason: String },

    /// Destination already holds something
    #[error("Destination path '{}' {reason}", .path.display())]
    DestinationConflict { path: PathBuf, reason: String },

    /// Every branch candidate failed to download
    #[error(
        "No archive found for '{repository}' (tried branches: {branches}); the repository may be private, missing or misnamed"
    )]
    ArchiveNotFound { repository: String, branches: String },

    /// Archive does not contain exactly one top-level directory
    #[error(
        "Unexpected archive layout: expected a single top-level directory, found {entries} top-level entries"
    )]
    UnexpectedArchiveLayout { entries: usize },

    /// Archive payload could not be read
    #[error("Downloaded file is not a valid archive: {reason}")]
    InvalidArchive { reason: String },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

impl CloneError {
    /// Get the appropriate exit code for this error type
    ///
    /// Exit code 2 is reserved for command-line usage errors.
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::InvalidReference { .. } | Self::MalformedUrl { .. } | Self::Configuration { .. } => 1,
            Self::SourceNotFound { .. }
            | Self::InvalidSource { .. }
            | Self::InvalidDestination { .. } => 3,
            Self::DestinationConflict { .. } => 4,
            Self::ArchiveNotFound { .. }
            | Self::UnexpectedArchiveLayout { .. }
            | Self::InvalidArchive { .. } => 5,
            Self::Filesystem { .. } => 6,
        }
    }

    /// Create an invalid reference error
    #[inline]
    pub fn invalid_reference<R: Into<String>, S: Into<String>>(reference: R, reason: S) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid destination error
    #[inline]
    pub fn invalid_destination<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::InvalidDestination {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a destination conflict error
    #[inline]
    pub fn destination_conflict<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::DestinationConflict {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid archive error
    #[inline]
    pub fn invalid_archive<S: Into<String>>(reason: S) -> Self {
        Self::InvalidArchive {
            reason: reason.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}
