//! Error types for wind-collector
//!
//! Centralized error handling using snafu for ergonomic error definitions.
//! A missing field in the upstream text is not an error; it is carried as `NaN`
//! inside the sample.

use snafu::Snafu;
use std::path::PathBuf;

/// Main error type for the collector
#[derive(Debug, Snafu)]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// Upstream fetch failed (timeout, DNS, non-2xx, body read)
    #[snafu(display("Transport error: {message}"))]
    Transport { message: String },

    /// Store write failed
    #[snafu(display("Failed to persist history to {}: {source}", path.display()))]
    Persistence {
        path: PathBuf,
        source: Box<Error>,
    },

    /// A bounded operation did not finish in time
    #[snafu(display("Timeout: {message}"))]
    Timeout { message: String },

    /// IO error (file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// CSV encoding/decoding error
    #[snafu(display("CSV error: {source}"))]
    Csv { source: csv::Error },

    /// JSON serialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },
}

impl Error {
    /// Whether this error came from the upstream fetch
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Whether this error came from writing the store
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(source: tokio::task::JoinError) -> Self {
        Error::Io {
            source: std::io::Error::other(source),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(source: csv::Error) -> Self {
        Error::Csv { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Transport {
            message: source.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
