//! Wind Collector Library
//!
//! Samples a weather station's free-text readout, turns it into normalized
//! wind and temperature samples, keeps a compacted rolling history and mirrors
//! it to a CSV file read by the dashboard.

pub mod constants;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod parsing;
pub mod services;

pub use domain::sample::Sample;
pub use error::{Error, Result};
