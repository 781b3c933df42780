//! Data models

pub mod analysis;
pub mod fraud;

pub use analysis::*;
pub use fraud::*;
