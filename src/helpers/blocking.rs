//! Blocking Work
//!
//! Runs synchronous file work on tokio's blocking pool so async callers never
//! stall a runtime worker.

use crate::error::{Error, Result};
use std::time::Duration;

/// Run `f` on the blocking pool and wait at most `limit` for it
///
/// On timeout the closure keeps running to completion in the background; its
/// result is discarded.
pub async fn run_blocking<T, F>(limit: Duration, operation: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);
    match tokio::time::timeout(limit, task).await {
        Ok(joined) => joined?,
        Err(_) => Err(Error::Timeout {
            message: format!("{operation} did not finish within {limit:?}"),
        }),
    }
}
