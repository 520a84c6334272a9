//! Local directory cloning

use crate::error::CloneError;
use crate::operations::guard::prepare_destination;
use crate::utils::fs::{copy_tree, create_parent_directories};
use crate::utils::path::{is_within, resolve_lenient};
use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Check a local source against a destination before anything is written
///
/// Returns the canonical source directory.
///
/// # Errors
///
/// Returns an error if:
/// - The source does not exist (`SourceNotFound`)
/// - The source is not a directory (`InvalidSource`)
/// - The destination is the source or lies inside it (`InvalidDestination`)
pub fn validate_local_source(source: &Path, destination: &Path) -> Result<PathBuf> {
    if !source.exists() {
        return Err(CloneError::SourceNotFound {
            path: source.to_path_buf(),
        }
        .into());
    }

    if !source.is_dir() {
        return Err(CloneError::InvalidSource {
            path: source.to_path_buf(),
        }
        .into());
    }

    let canonical_source = source
        .canonicalize()
        .with_context(|| format!("Failed to resolve source path: {}", source.display()))?;
    let resolved_destination = resolve_lenient(destination)?;
    debug!(
        "Resolved {} -> {}",
        canonical_source.display(),
        resolved_destination.display()
    );

    if resolved_destination == canonical_source {
        return Err(CloneError::invalid_destination(
            destination,
            "destination is the source directory",
        )
        .into());
    }

    if is_within(&resolved_destination, &canonical_source) {
        return Err(CloneError::invalid_destination(
            destination,
            "destination is inside the source directory",
        )
        .into());
    }

    Ok(canonical_source)
}

/// Copy a local directory tree to `destination`, returning the number of files copied
///
/// Version-control metadata at the source root is copied verbatim along with
/// everything else. A failed copy removes the partial destination.
///
/// # Errors
///
/// Returns the errors of [`validate_local_source`] and
/// [`prepare_destination`], or a filesystem error if copying fails.
pub fn clone_local(source: &Path, destination: &Path) -> Result<usize> {
    let canonical_source = validate_local_source(source, destination)?;
    prepare_destination(destination)?;
    create_parent_directories(destination)?;

    match copy_tree(&canonical_source, destination) {
        Ok(files) => Ok(files),
        Err(err) => {
            if destination.exists()
                && let Err(cleanup_err) = fs::remove_dir_all(destination)
            {
                warn!(
                    "Failed to remove partial destination {}: {cleanup_err}",
                    destination.display()
                );
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clone_local_copies_tree() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");

        fs::create_dir_all(source.join(".git/refs")).unwrap();
        fs::write(source.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(source.join("file1.txt"), "content1").unwrap();

        let files = clone_local(&source, &target).unwrap();

        assert_eq!(files, 2);
        assert!(target.join(".git/refs").is_dir());
        assert_eq!(
            fs::read_to_string(target.join(".git/HEAD")).unwrap(),
            "ref: refs/heads/main\n"
        );
    }

    #[test]
    fn test_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let err = clone_local(&temp_dir.path().join("nope"), &temp_dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CloneError>(),
            Some(CloneError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn test_source_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = clone_local(&file, &temp_dir.path().join("out")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CloneError>(),
            Some(CloneError::InvalidSource { .. })
        ));
    }

    #[test]
    fn test_destination_same_as_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();

        let err = clone_local(&source, &source.join(".")).unwrap_err();
        assert!(err.to_string().contains("destination is the source directory"));
    }

    #[test]
    fn test_destination_inside_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();

        let err = clone_local(&source, &source.join("nested/copy")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CloneError>(),
            Some(CloneError::InvalidDestination { .. })
        ));
        assert!(!source.join("nested").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_destination_inside_source_through_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();
        let alias = temp_dir.path().join("alias");
        std::os::unix::fs::symlink(&source, &alias).unwrap();

        let err = clone_local(&source, &alias.join("copy")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CloneError>(),
            Some(CloneError::InvalidDestination { .. })
        ));
        assert!(err.to_string().contains("destination is inside the source directory"));

        let entries: Vec<_> = fs::read_dir(&source).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(!source.join("copy").exists());
    }

    #[test]
    fn test_sibling_with_common_prefix_is_allowed() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();

        let files = clone_local(&source, &temp_dir.path().join("source-copy")).unwrap();
        assert_eq!(files, 1);
    }
}
