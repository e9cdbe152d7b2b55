//! Domain - Pure Data Structures and Rules
//!
//! These types do no I/O and represent the collection domain.

pub mod config;
pub mod history;
pub mod sample;
pub mod units;
