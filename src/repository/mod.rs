//! Repository reference module
//!
//! Classifies user input as a remote repository or a local directory and
//! parses hosting-service URLs

pub mod reference;
pub mod url;

pub use reference::*;
pub use self::url::*;
