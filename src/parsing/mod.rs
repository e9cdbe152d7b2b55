//! Parsing - Readout Text to Samples
//!
//! Field extraction by pattern and reconciliation of the extracted readings
//! into one normalized sample.

pub mod assemble;
pub mod extract;

pub use assemble::assemble;
pub use extract::{extract, Pattern};
