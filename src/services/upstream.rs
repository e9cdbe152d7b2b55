//! Upstream Readout
//!
//! Fetches the station's free-text readout. Any transport problem, including a
//! non-2xx status, surfaces as [`Error::Transport`].

use crate::error::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A source of raw readout text
pub trait Source: Send + Sync + 'static {
    /// Fetch the readout; `now_ms` is used for cache busting
    fn fetch(&self, now_ms: i64) -> impl Future<Output = Result<String>> + Send;
}

impl<T: Source> Source for Arc<T> {
    fn fetch(&self, now_ms: i64) -> impl Future<Output = Result<String>> + Send {
        (**self).fetch(now_ms)
    }
}

/// HTTP source backed by reqwest
#[derive(Clone, Debug)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source with a bounded request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// URL for one fetch, with the timestamp appended
    pub fn url_for(&self, now_ms: i64) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.base_url, separator, now_ms)
    }
}

impl Source for HttpSource {
    async fn fetch(&self, now_ms: i64) -> Result<String> {
        let url = self.url_for(now_ms);
        tracing::debug!("Fetching readout from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                message: format!("Upstream returned {status}"),
            });
        }
        Ok(response.text().await?)
    }
}
