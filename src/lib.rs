//! `snapclone` - A CLI tool for cloning repository snapshots
//!
//! This library fetches a single snapshot of a repository, either as a zip
//! archive from a hosting service (resolving the default branch and falling
//! back through conventional branch names) or by copying a local directory,
//! and materializes it at a destination path.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod remote;
pub mod repository;
pub mod transport;
pub mod utils;

use anyhow::Result;
use cli::{Args, Command};
use config::CloneConfig;
use operations::{CloneOperation, CloneOutcome};
use transport::ReqwestTransport;

/// Main entry point for the snapclone library
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the HTTP client cannot
/// be built, or the clone fails.
pub fn run(args: Args) -> Result<CloneOutcome> {
    match args.command {
        Command::Clone(clone_args) => {
            let config = clone_args.merge_into(CloneConfig::default());
            let transport = ReqwestTransport::new(&config.user_agent)?;
            let operation = CloneOperation::new(config, &transport)?;
            operation.execute(&clone_args.request())
        }
    }
}
