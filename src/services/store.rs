//! CSV Store
//!
//! Durable mirror of the compacted history. Every save rewrites the whole
//! file because compaction may remove rows that were already persisted.
//! The dashboard reads this file on its own schedule.
//!
//! Rows are encoded on the caller's task; the file write itself runs on the
//! blocking pool under a timeout.

use crate::constants::{DEFAULT_WRITE_TIMEOUT_SECS, STORE_COLUMNS};
use crate::domain::sample::Sample;
use crate::error::{Error, Result};
use crate::helpers::{run_blocking, write_atomic};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CSV file holding one row per retained sample
#[derive(Clone, Debug)]
pub struct CsvStore {
    path: PathBuf,
    write_timeout: Duration,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
        }
    }

    /// Bound each save by `timeout`
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted history; a missing file is an empty history
    pub fn load(&self) -> Result<Vec<Sample>> {
        if !self.path.exists() {
            tracing::info!("No store at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?;
        if headers.iter().ne(STORE_COLUMNS) {
            return Err(Error::Invalid {
                message: format!(
                    "Unexpected store header in {}: {:?}",
                    self.path.display(),
                    headers
                ),
            });
        }

        let mut samples = reader
            .deserialize::<Sample>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        // Rows are written in order; sort defensively for hand-edited files
        samples.sort_by_key(|sample| sample.timestamp);

        tracing::info!("Loaded {} samples from {}", samples.len(), self.path.display());
        Ok(samples)
    }

    /// Overwrite the store with `history`
    ///
    /// Encoding, IO failures and a write that outlives the timeout all come
    /// back as [`Error::Persistence`].
    pub async fn save(&self, history: &[Sample]) -> Result<()> {
        self.write(history).await.map_err(|source| Error::Persistence {
            path: self.path.clone(),
            source: Box::new(source),
        })
    }

    async fn write(&self, history: &[Sample]) -> Result<()> {
        let contents = encode(history)?;
        let path = self.path.clone();
        run_blocking(self.write_timeout, "store write", move || {
            write_atomic(&path, &contents)
        })
        .await
    }
}

/// Render `history` as the store's CSV text, header included
fn encode(history: &[Sample]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if history.is_empty() {
        // serde only emits the header alongside the first record
        writer.write_record(STORE_COLUMNS)?;
    }
    for sample in history {
        writer.serialize(sample)?;
    }
    writer.into_inner().map_err(|e| Error::Invalid {
        message: format!("CSV buffer flush failed: {e}"),
    })
}
