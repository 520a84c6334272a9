//! Operations module
//!
//! Coordinates clone operations including destination checks and local copying

pub mod clone;
pub mod copy;
pub mod guard;

pub use clone::*;
pub use copy::*;
pub use guard::*;
