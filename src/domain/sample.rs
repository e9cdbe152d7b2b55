//! Sample - One Normalized Weather Observation

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};

/// One observation of the station readout
///
/// Wind values are in m/s, direction in degrees, temperature in °C. A field
/// whose pattern did not match upstream is `NaN`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Collection time (ms since epoch)
    pub timestamp: i64,
    /// Mean wind speed (m/s)
    #[serde(deserialize_with = "reading")]
    pub wind_avg: f64,
    /// Mean wind direction (degrees)
    #[serde(deserialize_with = "reading")]
    pub wind_degrees: f64,
    /// Minimum wind speed (m/s)
    #[serde(deserialize_with = "reading")]
    pub wind_min: f64,
    /// Maximum wind speed (m/s)
    #[serde(deserialize_with = "reading")]
    pub wind_max: f64,
    /// Air temperature (°C)
    #[serde(deserialize_with = "reading")]
    pub temperature: f64,
}

impl Sample {
    /// A sample with every reading missing
    pub fn empty(timestamp: i64) -> Self {
        Self {
            timestamp,
            wind_avg: f64::NAN,
            wind_degrees: f64::NAN,
            wind_min: f64::NAN,
            wind_max: f64::NAN,
            temperature: f64::NAN,
        }
    }

    /// Readings in store column order, without the timestamp
    pub fn readings(&self) -> [f64; 5] {
        [
            self.wind_avg,
            self.wind_degrees,
            self.wind_min,
            self.wind_max,
            self.temperature,
        ]
    }

    /// True when every reading matches `other`, ignoring timestamps
    pub fn same_readings(&self, other: &Sample) -> bool {
        self.readings()
            .iter()
            .zip(other.readings().iter())
            .all(|(a, b)| same_reading(*a, *b))
    }

    /// Render as a JSON object with the store's column names
    ///
    /// Missing readings become `null`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Two readings are the same when numerically equal or both missing
pub fn same_reading(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Empty cells written by older collectors read back as missing
fn reading<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or(f64::NAN))
}
