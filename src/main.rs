//! # `snapclone`
//!
//! `snapclone` clones a snapshot of a repository without needing `git`.
//!
//! ## Features
//! - Clone from hosting-service HTTPS URLs by downloading a zip snapshot of the default branch.
//! - Fall back through conventional branch names when the default branch cannot be determined.
//! - Clone from a local path by copying the directory tree, `.git` included.
//!
//! ## Usage
//!
//! ```sh
//! snapclone clone https://github.com/user/repo.git
//! snapclone clone /path/to/local/repo my-copy
//! ```
//!
//! See `snapclone --help` for more options and details.

use anyhow::Result;
use clap::Parser as _;
use snapclone::cli::Args;
use snapclone::error::CloneError;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber based on verbose flag
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .without_time()
        .with_env_filter(filter)
        .init();

    match snapclone::run(args) {
        Ok(outcome) => {
            info!("{outcome}");
            std::process::exit(0);
        }
        Err(err) => {
            error!("{}", err);
            std::process::exit(
                err.downcast_ref::<CloneError>()
                    .map_or(1, CloneError::exit_code),
            );
        }
    }
}
