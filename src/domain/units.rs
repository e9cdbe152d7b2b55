//! Units - Wind Speed Conversion

use crate::constants::KNOTS_TO_MPS;

/// Convert knots to meters per second, rounded to one decimal place
///
/// `NaN` passes through unchanged.
pub fn knots_to_mps(knots: f64) -> f64 {
    (knots * KNOTS_TO_MPS * 10.0).round() / 10.0
}
