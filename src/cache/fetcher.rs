//! Network side of the cache
//!
//! `Fetcher` abstracts the single GET issued on a cache miss so the façade can
//! be exercised without a network. `HttpFetcher` is the reqwest-backed
//! implementation used by the binary.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Default timeout for a single request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching a response body
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote host could not be reached
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The remote host answered with a non-success status
    #[error("remote error: HTTP {status}")]
    Remote { status: u16 },

    /// The response body could not be read
    #[error("failed to read response body: {0}")]
    Io(String),
}

/// Source of raw response bodies for cache misses
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs a GET for `url` and returns the full body
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches bodies over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl HttpFetcher {
    /// Create a new HttpFetcher whose requests give up after `timeout`
    ///
    /// Falls back to reqwest's default client, without the timeout, if the
    /// configured client cannot be built.
    pub fn new(timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, ?timeout, "failed to build HTTP client, using defaults");
                Client::default()
            }
        };
        Self { client }
    }

    /// Create a new HttpFetcher with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Remote {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        Ok(body.to_vec())
    }
}
