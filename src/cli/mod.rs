//! Command-line interface module
//!
//! Handles argument parsing and maps arguments onto clone requests

pub mod args;

pub use args::*;
