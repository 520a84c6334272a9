//! Archive unpacking and relocation
//!
//! Snapshots from the hosting service always wrap the repository in a single
//! top-level directory (`<repo>-<branch>/`). The installer unpacks into a
//! private staging directory, checks for exactly that shape, and moves the
//! wrapper's contents into place.

use crate::error::CloneError;
use crate::utils::fs::{
    copy_tree, create_parent_directories, remove_created_directories, topmost_missing_ancestor,
};
use crate::utils::path::{is_within, resolve_lenient};
use anyhow::{Context as _, Result};
use std::fs::{self, File};
use std::io::{self, Seek as _, SeekFrom, Write as _};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};
use zip::ZipArchive;

/// Prefix of the staging directory created next to the destination
pub const STAGING_PREFIX: &str = ".snapclone-";

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Installs a zip snapshot at a destination
#[derive(Debug, Clone, Default)]
pub struct ArchiveInstaller {
    temp_root: Option<PathBuf>,
}

impl ArchiveInstaller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the temporary archive file under `dir` instead of the system temp dir
    #[must_use]
    pub fn with_temp_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.temp_root = Some(dir.into());
        self
    }

    /// Install `bytes` at `destination`, returning the number of files installed
    ///
    /// `destination` must be absent; its parent is created if needed. The
    /// temporary archive file and the staging directory are removed on every
    /// return path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bytes are not a readable zip, or an entry escapes the archive root
    /// - The archive does not hold exactly one top-level directory
    /// - Any filesystem operation fails
    pub fn install(&self, bytes: &[u8], destination: &Path) -> Result<usize> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                CloneError::invalid_destination(destination, "destination has no parent directory")
            })?;

        let created = topmost_missing_ancestor(parent);
        create_parent_directories(destination)?;

        let result = self.install_into(bytes, parent, destination);
        if result.is_err()
            && let Some(created) = created
        {
            remove_created_directories(parent, &created);
        }
        result
    }

    fn install_into(&self, bytes: &[u8], parent: &Path, destination: &Path) -> Result<usize> {
        let mut archive_file = self.write_archive(bytes)?;
        let staging = Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
            .with_context(|| {
                format!("Failed to create staging directory in: {}", parent.display())
            })?;
        debug!("Staging archive in {}", staging.path().display());

        archive_file
            .as_file_mut()
            .seek(SeekFrom::Start(0))
            .context("Failed to rewind temporary archive")?;
        let files = unpack(archive_file.as_file_mut(), staging.path())?;

        let root = locate_root(staging.path())?;
        relocate(&root, destination)?;

        debug!("Installed {files} files into {}", destination.display());
        Ok(files)
    }

    fn write_archive(&self, bytes: &[u8]) -> Result<NamedTempFile> {
        let mut builder = Builder::new();
        builder.prefix("snapclone-").suffix(".zip");
        let mut file = match &self.temp_root {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("Failed to create temporary archive file")?;

        file.write_all(bytes)
            .and_then(|()| file.flush())
            .context("Failed to write temporary archive file")?;
        Ok(file)
    }
}

/// Install `bytes` at `destination` using the system temp dir
///
/// # Errors
///
/// See [`ArchiveInstaller::install`].
pub fn install_archive(bytes: &[u8], destination: &Path) -> Result<usize> {
    ArchiveInstaller::new().install(bytes, destination)
}

/// Extract every entry of the zip into `target`
///
/// Every write is checked against the canonical `target` after resolving
/// links already on disk, so an entry cannot land outside it through a
/// symbolic link unpacked earlier.
fn unpack(file: &mut File, target: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(file).map_err(|e| {
        debug!("Failed to open archive: {e}");
        return CloneError::invalid_archive("not a zip archive");
    })?;
    let root = target
        .canonicalize()
        .with_context(|| format!("Failed to resolve staging directory: {}", target.display()))?;
    let mut files = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            debug!("Failed to read archive entry #{index}: {e}");
            return CloneError::invalid_archive("unreadable archive entry");
        })?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(CloneError::invalid_archive(format!(
                "entry '{}' escapes the archive root",
                entry.name()
            ))
            .into());
        };
        let out_path = root.join(&relative);
        ensure_contained(&root, &out_path, entry.name())?;

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("Failed to create directory: {}", relative.display()))?;
            continue;
        }

        create_parent_directories(&out_path)?;
        let mode = entry.unix_mode();

        if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            let mut link_target = String::new();
            io::Read::read_to_string(&mut entry, &mut link_target).map_err(|e| {
                debug!("Failed to read link target of '{}': {e}", entry.name());
                return CloneError::invalid_archive("unreadable symbolic link entry");
            })?;
            write_symlink(&link_target, &out_path)?;
        } else {
            let mut out_file = File::create(&out_path)
                .with_context(|| format!("Failed to create file: {}", relative.display()))?;
            io::copy(&mut entry, &mut out_file)
                .with_context(|| format!("Failed to extract: {}", relative.display()))?;
            set_mode(&out_path, mode)?;
        }
        files += 1;
    }

    Ok(files)
}

/// Reject `path` if links already unpacked would redirect it outside `root`
fn ensure_contained(root: &Path, path: &Path, name: &str) -> Result<()> {
    // A dangling link cannot be resolved and would be followed by the write
    let contained = resolve_lenient(path).is_ok_and(|resolved| is_within(&resolved, root));
    if !contained {
        return Err(CloneError::invalid_archive(format!(
            "entry '{name}' is written through a symbolic link outside the archive root"
        ))
        .into());
    }
    Ok(())
}

/// The single top-level directory of an unpacked snapshot
fn locate_root(staging: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(staging)
        .with_context(|| format!("Failed to read staging directory: {}", staging.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .context("Failed to read staging directory entry")?;

    match entries.as_slice() {
        [root] if root.is_dir() => Ok(root.clone()),
        _ => Err(CloneError::UnexpectedArchiveLayout {
            entries: entries.len(),
        }
        .into()),
    }
}

/// Move the unpacked root to `destination`, copying if a rename is not possible
fn relocate(root: &Path, destination: &Path) -> Result<()> {
    match fs::rename(root, destination) {
        Ok(()) => Ok(()),
        Err(err) => {
            debug!("Rename failed ({err}), copying instead");
            if let Err(copy_err) = copy_tree(root, destination) {
                if destination.exists()
                    && let Err(cleanup_err) = fs::remove_dir_all(destination)
                {
                    warn!(
                        "Failed to remove partial destination {}: {cleanup_err}",
                        destination.display()
                    );
                }
                return Err(copy_err);
            }
            Ok(())
        }
    }
}

#[cfg(unix)]
fn write_symlink(link_target: &str, path: &Path) -> Result<()> {
    std::os::unix::fs::symlink(link_target, path)
        .with_context(|| format!("Failed to create symbolic link: {}", path.display()))
}

#[cfg(not(unix))]
fn write_symlink(link_target: &str, path: &Path) -> Result<()> {
    fs::write(path, link_target)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt as _;

    if let Some(mode) = mode.map(|m| m & 0o7777).filter(|&m| m != 0) {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .with_context(|| format!("Failed to set permissions on: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}
