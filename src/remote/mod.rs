//! Remote snapshot retrieval
//!
//! Branch resolution, archive download and archive installation for
//! repositories on the hosting service

pub mod branch;
pub mod fetch;
pub mod install;

pub use branch::*;
pub use fetch::*;
pub use install::*;
