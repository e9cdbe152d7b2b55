//! Config - Collector Configuration
//!
//! Loaded from TOML. Every key is optional and falls back to the defaults in
//! [`crate::constants`].

use crate::constants::{
    CONFIG_FILE, DEFAULT_BASE_URL, DEFAULT_FETCH_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETENTION_HOURS, DEFAULT_STORE_FILE, DEFAULT_WRITE_TIMEOUT_SECS, MS_PER_HOUR,
};
use crate::error::{Error, Result};
use crate::helpers::{get_or_create_config_dir, get_or_create_data_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main collector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Upstream readout URL (already carries a query string)
    pub base_url: String,
    /// Seconds between periodic ticks
    pub fetch_interval_secs: u64,
    /// Retention horizon in hours
    pub retention_hours: u64,
    /// Upstream request timeout in seconds
    pub request_timeout_secs: u64,
    /// Store write timeout in seconds
    pub write_timeout_secs: u64,
    /// CSV store location; defaults to the platform data directory
    pub store_path: Option<PathBuf>,
    /// Directory for rolling log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_interval_secs: DEFAULT_FETCH_INTERVAL_SECS,
            retention_hours: DEFAULT_RETENTION_HOURS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            store_path: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Config file to read: the explicit path, else `config.toml` in the
    /// platform config directory when it exists, else none
    pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            return Ok(Some(path.to_path_buf()));
        }
        let default_path = get_or_create_config_dir()?.join(CONFIG_FILE);
        Ok(default_path.exists().then_some(default_path))
    }

    /// Load from `path`, or the defaults when there is no file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Self::from_toml(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Reject values the collector cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Invalid {
                message: format!("base_url must be an http(s) URL, got {:?}", self.base_url),
            });
        }
        if self.fetch_interval_secs == 0 {
            return Err(Error::Invalid {
                message: "fetch_interval_secs must be positive".to_string(),
            });
        }
        if self.retention_hours == 0 {
            return Err(Error::Invalid {
                message: "retention_hours must be positive".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Invalid {
                message: "request_timeout_secs must be positive".to_string(),
            });
        }
        if self.write_timeout_secs == 0 {
            return Err(Error::Invalid {
                message: "write_timeout_secs must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn retention_ms(&self) -> i64 {
        i64::try_from(self.retention_hours)
            .unwrap_or(i64::MAX)
            .saturating_mul(MS_PER_HOUR)
    }

    /// Resolve the store path, creating the data directory for the default
    pub fn resolve_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(get_or_create_data_dir()?.join(DEFAULT_STORE_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").expect("empty config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.fetch_interval(), Duration::from_secs(30));
        assert_eq!(config.retention_ms(), 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_toml(
            r#"
            base_url = "http://localhost:8080/readout?x=1"
            fetch_interval_secs = 5
            retention_hours = 2
            store_path = "/tmp/wind.csv"
            "#,
        )
        .expect("config");
        assert_eq!(config.fetch_interval_secs, 5);
        assert_eq!(config.retention_ms(), 2 * MS_PER_HOUR);
        assert_eq!(
            config.resolve_store_path().expect("path"),
            PathBuf::from("/tmp/wind.csv")
        );
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.write_timeout(), Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(AppConfig::from_toml("fetch_intervall = 5").is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_toml("fetch_interval_secs = 0").expect_err("zero interval");
        assert!(matches!(err, Error::Invalid { .. }));
        let err = AppConfig::from_toml(r#"base_url = "ftp://example""#).expect_err("scheme");
        assert!(matches!(err, Error::Invalid { .. }));
        let err = AppConfig::from_toml("write_timeout_secs = 0").expect_err("zero write timeout");
        assert!(matches!(err, Error::Invalid { .. }));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("collector.toml");
        std::fs::write(&path, "retention_hours = 6\n").expect("write");
        let config = AppConfig::load(Some(&path)).expect("load");
        assert_eq!(config.retention_hours, 6);
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let path = PathBuf::from("/etc/wind/collector.toml");
        assert_eq!(AppConfig::locate(Some(&path)).expect("locate"), Some(path));
    }

    #[test]
    fn test_load_without_file_is_defaults() {
        assert_eq!(AppConfig::load(None).expect("defaults"), AppConfig::default());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).expect_err("missing");
        assert!(matches!(err, Error::Io { .. }));
    }
}
