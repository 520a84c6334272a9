//! Hosting-service URL parsing

use crate::error::CloneError;
use crate::utils::path::strip_git_suffix;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Characters allowed in owner and repository names
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("identifier pattern is valid"));

/// Extract `(owner, repository)` from a hosting-service URL
///
/// The first two non-empty path segments are used, a trailing `.git` is
/// stripped from the repository, and anything after them (`/tree/main`,
/// query strings, fragments) is ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The path has fewer than two segments (`MalformedUrl`)
/// - The repository name is empty once `.git` is stripped (`MalformedUrl`)
/// - A segment contains characters outside `[A-Za-z0-9._-]` or is `.`/`..`
pub fn parse_remote_url(url: &Url) -> Result<(String, String)> {
    let mut segments = url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty());

    let (Some(owner), Some(repository)) = (segments.next(), segments.next()) else {
        return Err(CloneError::MalformedUrl {
            url: url.to_string(),
        }
        .into());
    };

    let repository = strip_git_suffix(repository);
    if repository.is_empty() {
        return Err(CloneError::MalformedUrl {
            url: url.to_string(),
        }
        .into());
    }

    validate_identifier(url, "owner", owner)?;
    validate_identifier(url, "repository", repository)?;

    return Ok((owner.to_owned(), repository.to_owned()));
}

fn validate_identifier(url: &Url, label: &str, value: &str) -> Result<()> {
    if value == "." || value == ".." || !IDENTIFIER.is_match(value) {
        return Err(CloneError::invalid_reference(
            url.as_str(),
            format!("{label} name '{value}' contains unsupported characters"),
        )
        .into());
    }
    Ok(())
}
