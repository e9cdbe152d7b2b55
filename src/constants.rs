//! Collector Constants
//!
//! Defaults for the collection pipeline. Each one can be overridden from the
//! configuration file except the store column layout.

/// Upstream readout (the timestamp is appended as `&{ms}` for cache busting)
pub const DEFAULT_BASE_URL: &str = "https://wx.awos.se/get.aspx?viewId=kristianstad-overview.html";

/// Seconds between periodic ticks
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 30;

/// Retention horizon in hours
pub const DEFAULT_RETENTION_HOURS: u64 = 24;

/// Upstream request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Store write timeout
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 5;

/// Store file name inside the data directory
pub const DEFAULT_STORE_FILE: &str = "weather_entries.csv";

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Fixed CSV header of the store
pub const STORE_COLUMNS: [&str; 6] = [
    "timestamp",
    "windAvg",
    "windDegrees",
    "windMin",
    "windMax",
    "temperature",
];

/// Knots to meters per second
pub const KNOTS_TO_MPS: f64 = 0.51444;

pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
