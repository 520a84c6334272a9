//! Utility functions module
//!
//! Path resolution and filesystem helpers shared by the clone operations

pub mod fs;
pub mod path;
