//! Static game content and the lookup traits the engine reads it through.

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
