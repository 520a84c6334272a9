use crate::config::CloneConfig;
use crate::operations::CloneRequest;
use clap::{Parser, Subcommand};
use core::time::Duration;
use std::path::PathBuf;

/// Command-line arguments for snapclone
#[derive(Parser, Debug, Clone)]
#[command(name = "snapclone")]
#[command(
    about = "A CLI tool for cloning repository snapshots from a hosting service or a local directory"
)]
#[command(long_about = None)]
#[command(version)]
#[command(after_help = "Examples:
  snapclone clone https://github.com/user/repo.git
  snapclone clone https://github.com/user/repo.git my-folder
  snapclone clone /path/to/local/repo
  snapclone clone /path/to/local/repo my-copy")]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Clone a repository snapshot
    Clone(CloneArgs),
}

/// Arguments for the clone command
#[derive(clap::Args, Debug, Clone)]
pub struct CloneArgs {
    /// Hosting-service HTTPS URL or local directory path
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Destination directory (defaults to the repository or directory name)
    #[arg(value_name = "DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Timeout in seconds for the repository metadata request
    #[arg(
        long,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub metadata_timeout: Option<u64>,

    /// Timeout in seconds for each archive download
    #[arg(
        long,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub download_timeout: Option<u64>,
}

impl CloneArgs {
    /// The clone request described by these arguments
    #[must_use]
    pub fn request(&self) -> CloneRequest {
        CloneRequest::new(self.source.clone(), self.destination.clone())
    }

    /// Apply command-line overrides on top of `config`
    #[must_use]
    pub fn merge_into(&self, mut config: CloneConfig) -> CloneConfig {
        if let Some(secs) = self.metadata_timeout {
            config.metadata_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.download_timeout {
            config.download_timeout = Duration::from_secs(secs);
        }
        config
    }
}
