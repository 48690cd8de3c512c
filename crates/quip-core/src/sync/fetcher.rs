//! Remote snapshot fetching
//!
//! Retrieves the remote quote source over HTTP with a bounded timeout.
//! A failed fetch means "no update this cycle", never "remote is empty";
//! the fetcher does not touch local state.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::models::{Quote, RemoteRecord};

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Errors that can occur while retrieving the remote snapshot
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network-level failure (connect, timeout, TLS, ...)
    #[error("Failed to reach remote source: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Remote source answered with status {status}")]
    Status { status: reqwest::StatusCode },

    /// Response body was not a JSON array of records
    #[error("Malformed remote response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fetches remote snapshots from a fixed URL
pub struct RemoteFetcher {
    client: reqwest::Client,
    url: String,
}

impl RemoteFetcher {
    /// Create a fetcher for the given source URL
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent("quip/0.3")
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The source URL this fetcher polls
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retrieve a snapshot of remote quotes
    ///
    /// Records are mapped to quotes with the `"Uncategorized"` fallback
    /// category. The snapshot is ephemeral; the caller merges and
    /// discards it.
    pub async fn fetch(&self) -> Result<Vec<Quote>, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.text().await?;
        let records: Vec<RemoteRecord> = serde_json::from_str(&body)?;

        debug!("Fetched {} remote records from {}", records.len(), self.url);
        Ok(records.into_iter().map(Quote::from).collect())
    }
}
