//! Fetch-or-serve façade over the cache store
//!
//! Callers hand over a fully qualified URL and get the raw body back, either
//! straight from the store or from the network on a miss.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::fetcher::{FetchError, Fetcher, HttpFetcher, DEFAULT_REQUEST_TIMEOUT};
use super::reaper::{Reaper, ReaperHandle, DEFAULT_REAP_INTERVAL};
use super::store::CacheStore;

/// Default time-to-live for cached responses
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

/// Configuration for the response cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry stays cached
    pub ttl: Duration,
    /// Interval between reaper sweeps
    pub reap_interval: Duration,
    /// Timeout for each network request
    pub request_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            reap_interval: DEFAULT_REAP_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Serves cached response bodies and fetches the rest
pub struct CachedClient {
    store: CacheStore,
    fetcher: Arc<dyn Fetcher>,
    reaper: ReaperHandle,
}

impl CachedClient {
    /// Creates a client backed by `HttpFetcher` and starts its reaper
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &CacheConfig) -> Self {
        let fetcher = HttpFetcher::new(config.request_timeout);
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Creates a client with a custom fetcher and starts its reaper
    pub fn with_fetcher(config: &CacheConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let store = CacheStore::new(config.ttl);
        let reaper = Reaper::spawn(&store, config.reap_interval);
        Self {
            store,
            fetcher,
            reaper,
        }
    }

    /// Returns the underlying store
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Returns the body for `url`, from the cache when possible
    ///
    /// On a miss the body is fetched, stored under `url` and returned. A failed
    /// fetch leaves the store untouched, so the next call goes to the network
    /// again.
    pub async fn fetch_or_serve(&self, url: &str) -> Result<Arc<[u8]>, FetchError> {
        if let Some(body) = self.store.get(url) {
            debug!(url, "cache hit");
            return Ok(body);
        }

        debug!(url, "cache miss, fetching");
        let body: Arc<[u8]> = match self.fetcher.fetch(url).await {
            Ok(body) => body.into(),
            Err(e) => {
                warn!(url, error = %e, "fetch failed");
                return Err(e);
            }
        };

        self.store.add(url, Arc::clone(&body));
        Ok(body)
    }

    /// Stops the background reaper
    pub async fn shutdown(self) {
        self.reaper.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory fetcher that counts network calls
    #[derive(Default)]
    struct CountingFetcher {
        responses: HashMap<String, Result<Vec<u8>, u16>>,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn with_response(mut self, url: &str, body: &[u8]) -> Self {
            self.responses.insert(url.to_string(), Ok(body.to_vec()));
            self
        }

        fn with_status(mut self, url: &str, status: u16) -> Self {
            self.responses.insert(url.to_string(), Err(status));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Remote { status: *status }),
                None => Err(FetchError::Remote { status: 404 }),
            }
        }
    }

    fn test_config() -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(60),
            reap_interval: Duration::from_millis(100),
            request_timeout: Duration::from_secs(1),
        }
    }

    const URL: &str = "https://pokeapi.co/api/v2/pokemon/pikachu";

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3));
        assert_eq!(config.reap_interval, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_preseeded_entry_skips_network() {
        let fetcher = Arc::new(CountingFetcher::default());
        let client = CachedClient::with_fetcher(&test_config(), fetcher.clone());
        client.store().add(URL, b"cached".to_vec());

        let body = client.fetch_or_serve(URL).await.expect("should serve cache");

        assert_eq!(&body[..], b"cached");
        assert_eq!(fetcher.calls(), 0);
        client.shutdown().await;
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores_body() {
        let fetcher = Arc::new(CountingFetcher::default().with_response(URL, b"fresh"));
        let client = CachedClient::with_fetcher(&test_config(), fetcher.clone());

        let body = client.fetch_or_serve(URL).await.expect("fetch should succeed");

        assert_eq!(&body[..], b"fresh");
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(&client.store().get(URL).expect("body should be cached")[..], b"fresh");
        client.shutdown().await;
    }

    #[tokio::test]
    async fn test_repeated_requests_hit_network_once() {
        let fetcher = Arc::new(CountingFetcher::default().with_response(URL, b"fresh"));
        let client = CachedClient::with_fetcher(&test_config(), fetcher.clone());

        for _ in 0..5 {
            client.fetch_or_serve(URL).await.unwrap();
        }

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(client.store().len(), 1);
        client.shutdown().await;
    }

    #[tokio::test]
    async fn test_remote_404_returns_error_and_stores_nothing() {
        let fetcher = Arc::new(CountingFetcher::default().with_status(URL, 404));
        let client = CachedClient::with_fetcher(&test_config(), fetcher.clone());

        let result = client.fetch_or_serve(URL).await;

        assert!(matches!(result, Err(FetchError::Remote { status: 404 })));
        assert!(client.store().get(URL).is_none());
        assert!(client.store().is_empty());
        client.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let fetcher = Arc::new(CountingFetcher::default().with_status(URL, 500));
        let client = CachedClient::with_fetcher(&test_config(), fetcher.clone());

        assert!(client.fetch_or_serve(URL).await.is_err());
        assert!(client.fetch_or_serve(URL).await.is_err());

        assert_eq!(fetcher.calls(), 2, "each failure should retry the network");
        client.shutdown().await;
    }

    #[tokio::test]
    async fn test_expired_entry_is_fetched_again() {
        let config = CacheConfig {
            ttl: Duration::from_millis(100),
            reap_interval: Duration::from_millis(50),
            request_timeout: Duration::from_secs(1),
        };
        let fetcher = Arc::new(CountingFetcher::default().with_response(URL, b"fresh"));
        let client = CachedClient::with_fetcher(&config, fetcher.clone());

        client.fetch_or_serve(URL).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        client.fetch_or_serve(URL).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        client.shutdown().await;
    }
}
