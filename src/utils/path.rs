//! Path manipulation and resolution utilities

use anyhow::{Context as _, Result};
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
///
/// Purely lexical: symlinks are not consulted and the path need not exist.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Make `path` absolute by joining it onto `base`, then normalize it
#[must_use]
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Expand a leading `~` to the user's home directory
///
/// Paths without a leading `~`, or when no home directory is known, are
/// returned unchanged. `~user` forms are not expanded.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
            .or_else(|| path.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Resolve an absolute path through symlinks even if it does not exist yet
///
/// The nearest existing ancestor is canonicalized and the remaining
/// components are appended unchanged.
pub fn resolve_lenient(path: &Path) -> Result<PathBuf> {
    let normalized = normalize_path(path);
    let mut existing = normalized.as_path();
    let mut missing = Vec::new();

    while existing.symlink_metadata().is_err() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_owned());
                existing = parent;
            }
            _ => return Ok(normalized),
        }
    }

    let mut resolved = existing
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", existing.display()))?;
    for name in missing.iter().rev() {
        resolved.push(name);
    }

    Ok(resolved)
}

/// Check if `path` is `base` or lies underneath it
#[must_use]
pub fn is_within(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}

/// Strip a literal trailing `.git` from a repository name
#[must_use]
pub fn strip_git_suffix(name: &str) -> &str {
    name.strip_suffix(".git").unwrap_or(name)
}
