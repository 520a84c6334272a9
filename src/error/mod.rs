//! Error handling module
//!
//! Defines the clone error taxonomy with appropriate exit codes

pub mod types;

pub use types::*;
