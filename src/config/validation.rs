//! Configuration validation logic

use crate::config::CloneConfig;
use crate::error::CloneError;
use anyhow::Result;
use url::Url;

impl CloneConfig {
    /// Validate this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails [`validate_config`]
    #[inline]
    pub fn validate(&self) -> Result<()> {
        validate_config(self)
    }
}

/// Validate a complete configuration
///
/// # Errors
///
/// Returns an error if:
/// - No hosting-service host is configured
/// - The API or archive base is not an http(s) URL
/// - A timeout is zero
/// - The fallback branch set is empty or contains a blank name
#[inline]
pub fn validate_config(config: &CloneConfig) -> Result<()> {
    if config.hosts.iter().all(|h| h.trim().is_empty()) {
        return Err(CloneError::configuration("At least one host must be configured").into());
    }

    validate_base_url("API base", &config.api_base)?;
    validate_base_url("Archive base", &config.archive_base)?;

    if config.metadata_timeout.is_zero() {
        return Err(CloneError::configuration("Metadata timeout must be greater than zero").into());
    }
    if config.download_timeout.is_zero() {
        return Err(CloneError::configuration("Download timeout must be greater than zero").into());
    }

    if config.fallback_branches.is_empty() {
        return Err(
            CloneError::configuration("Fallback branch list cannot be empty").into(),
        );
    }
    for (index, branch) in config.fallback_branches.iter().enumerate() {
        if branch.trim().is_empty() {
            return Err(CloneError::configuration(format!(
                "Fallback branch #{} cannot be empty",
                index + 1
            ))
            .into());
        }
    }

    Ok(())
}

fn validate_base_url(label: &str, value: &str) -> Result<()> {
    let parsed = Url::parse(value).map_err(|e| {
        return CloneError::configuration(format!("{label} '{value}' is not a valid URL: {e}"));
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CloneError::configuration(format!(
            "{label} '{value}' must use http or https"
        ))
        .into());
    }

    Ok(())
}
