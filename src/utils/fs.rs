//! File system utilities

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Create parent directories for a path if they don't exist
pub fn create_parent_directories(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create parent directories for: {}", path.display())
        })?;
    }
    Ok(())
}

/// Check if directory is empty
pub fn is_directory_empty(dir_path: &Path) -> Result<bool> {
    if !dir_path.is_dir() {
        return Ok(false);
    }

    let mut entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.display()))?;

    Ok(entries.next().is_none())
}

/// The highest ancestor-or-self of `path` that does not exist yet
///
/// Returns `None` when `path` already exists.
#[must_use]
pub fn topmost_missing_ancestor(path: &Path) -> Option<PathBuf> {
    let mut missing = None;
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() || ancestor.symlink_metadata().is_ok() {
            break;
        }
        missing = Some(ancestor.to_path_buf());
    }
    missing
}

/// Remove the empty directories from `path` up to and including `top`
///
/// Stops at the first directory that cannot be removed, which leaves
/// anything another writer put there in place.
pub fn remove_created_directories(path: &Path, top: &Path) {
    if !path.starts_with(top) {
        return;
    }
    for ancestor in path.ancestors() {
        if fs::remove_dir(ancestor).is_err() {
            debug!("Keeping directory: {}", ancestor.display());
            return;
        }
        if ancestor == top {
            return;
        }
    }
}

/// Recursively copy `source` to `target`, returning the number of files copied
///
/// `target` must not exist. Directory structure, file contents and permission
/// bits are preserved, hidden entries (including `.git`) are copied like any
/// other, and symbolic links are recreated as links on unix.
pub fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let mut files_copied = 0;
    let mut directories: Vec<(PathBuf, fs::Permissions)> = Vec::new();

    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry.context("Failed to read directory entry")?;
        let source_path = entry.path();

        let relative_path = source_path
            .strip_prefix(source)
            .context("Failed to calculate relative path")?;
        let target_path = target.join(relative_path);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target_path).with_context(|| {
                format!("Failed to create directory: {}", target_path.display())
            })?;
            let permissions = entry
                .metadata()
                .with_context(|| format!("Failed to read metadata: {}", source_path.display()))?
                .permissions();
            directories.push((target_path, permissions));
        } else if file_type.is_symlink() {
            copy_symlink(source_path, &target_path)?;
            files_copied += 1;
        } else {
            fs::copy(source_path, &target_path).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    source_path.display(),
                    target_path.display()
                )
            })?;
            files_copied += 1;
        }
    }

    // Applied last so read-only directories don't block their own contents
    for (path, permissions) in directories.into_iter().rev() {
        fs::set_permissions(&path, permissions)
            .with_context(|| format!("Failed to set permissions on: {}", path.display()))?;
    }

    debug!("Copied {files_copied} files into {}", target.display());
    Ok(files_copied)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let link_target = fs::read_link(source)
        .with_context(|| format!("Failed to read symbolic link: {}", source.display()))?;
    std::os::unix::fs::symlink(&link_target, target)
        .with_context(|| format!("Failed to create symbolic link: {}", target.display()))?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).with_context(|| {
        format!(
            "Failed to copy linked file from {} to {}",
            source.display(),
            target.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested_file = temp_dir.path().join("a/b/c/file.txt");

        assert!(create_parent_directories(&nested_file).is_ok());
        assert!(nested_file.parent().unwrap().exists());
    }

    #[test]
    fn test_topmost_missing_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b/c");

        assert_eq!(topmost_missing_ancestor(&nested), Some(temp_dir.path().join("a")));
        assert_eq!(topmost_missing_ancestor(temp_dir.path()), None);
    }

    #[test]
    fn test_remove_created_directories_stops_at_top() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("keep.txt"), "keep").unwrap();

        remove_created_directories(&nested, &temp_dir.path().join("a"));

        assert!(!temp_dir.path().join("a").exists());
        assert!(temp_dir.path().exists());
    }

    #[test]
    fn test_remove_created_directories_keeps_non_empty() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("a/other.txt"), "x").unwrap();

        remove_created_directories(&nested, &temp_dir.path().join("a"));

        assert!(!nested.exists());
        assert!(temp_dir.path().join("a/other.txt").exists());
    }

    #[test]
    fn test_is_directory_empty() {
        let temp_dir = TempDir::new().unwrap();
        let empty_dir = temp_dir.path().join("empty");
        let non_empty_dir = temp_dir.path().join("non_empty");

        fs::create_dir_all(&empty_dir).unwrap();
        fs::create_dir_all(&non_empty_dir).unwrap();
        fs::write(non_empty_dir.join("file.txt"), b"content").unwrap();

        assert!(is_directory_empty(&empty_dir).unwrap());
        assert!(!is_directory_empty(&non_empty_dir).unwrap());
        assert!(!is_directory_empty(&non_empty_dir.join("file.txt")).unwrap());
    }

    #[test]
    fn test_copy_tree() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("source");
        let target_dir = temp_dir.path().join("target");

        fs::create_dir_all(source_dir.join("subdir")).unwrap();
        fs::create_dir_all(source_dir.join("empty")).unwrap();
        fs::write(source_dir.join("file1.txt"), "content1").unwrap();
        fs::write(source_dir.join("subdir/file2.txt"), "content2").unwrap();

        let copied = copy_tree(&source_dir, &target_dir).unwrap();
        assert_eq!(copied, 2);

        assert_eq!(
            fs::read_to_string(target_dir.join("file1.txt")).unwrap(),
            "content1"
        );
        assert_eq!(
            fs::read_to_string(target_dir.join("subdir/file2.txt")).unwrap(),
            "content2"
        );
        assert!(target_dir.join("empty").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_preserves_modes_and_links() {
        use std::os::unix::fs::PermissionsExt as _;

        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("source");
        let target_dir = temp_dir.path().join("target");

        fs::create_dir_all(&source_dir).unwrap();
        let script = source_dir.join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        std::os::unix::fs::symlink("run.sh", source_dir.join("link.sh")).unwrap();

        copy_tree(&source_dir, &target_dir).unwrap();

        let mode = fs::metadata(target_dir.join("run.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
        assert_eq!(
            fs::read_link(target_dir.join("link.sh")).unwrap(),
            PathBuf::from("run.sh")
        );
    }
}
