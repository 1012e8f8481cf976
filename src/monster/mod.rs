//! Monster types and leveling.

pub mod progression;
pub mod types;

pub use progression::*;
pub use types::*;
