//! Destination pre-flight checks
//!
//! The check and the later write are not atomic: a concurrent writer to the
//! same destination can slip in between. Only one invocation per destination
//! is supported.

use crate::error::CloneError;
use crate::utils::fs::is_directory_empty;
use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// What currently sits at a destination that passed the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationState {
    /// Nothing at the path
    Absent,
    /// An empty directory
    EmptyDirectory,
}

/// Check a destination without touching it
///
/// # Errors
///
/// Returns `DestinationConflict` if the path is a non-empty directory or
/// anything other than a directory.
pub fn check_destination(destination: &Path) -> Result<DestinationState> {
    let Ok(metadata) = destination.symlink_metadata() else {
        return Ok(DestinationState::Absent);
    };

    if !metadata.is_dir() {
        return Err(
            CloneError::destination_conflict(destination, "exists and is not a directory").into(),
        );
    }

    if !is_directory_empty(destination)? {
        return Err(
            CloneError::destination_conflict(destination, "already exists and is not empty")
                .into(),
        );
    }

    Ok(DestinationState::EmptyDirectory)
}

/// Check a destination and clear the way for writing it
///
/// An empty directory is removed so every clone path starts from an absent
/// destination.
///
/// # Errors
///
/// Returns the errors of [`check_destination`], or a filesystem error if the
/// empty directory cannot be removed.
pub fn prepare_destination(destination: &Path) -> Result<()> {
    if check_destination(destination)? == DestinationState::EmptyDirectory {
        debug!("Removing empty destination directory: {}", destination.display());
        fs::remove_dir(destination).with_context(|| {
            format!(
                "Failed to remove empty destination directory: {}",
                destination.display()
            )
        })?;
    }
    Ok(())
}
