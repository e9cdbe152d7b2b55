//! Helper Utilities
//!
//! Common utilities used across the collector.

mod blocking;
mod fs;

pub use blocking::*;
pub use fs::*;
