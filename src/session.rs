//! Session state shared by every command
//!
//! A `Session` is created once at startup and passed by `&mut` into each
//! command handler. It owns the cached API client, the location-area
//! pagination cursors and the list of caught pokemon.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;

use crate::cache::{CachedClient, FetchError};
use crate::cli::StartupConfig;
use crate::data::location_areas_url;

/// Mutable state of one interactive session
pub struct Session {
    /// Cached API client every command fetches through
    client: CachedClient,
    /// Base URL request keys are built from
    base_url: String,
    /// Page shown by the last `map`/`mapb`, or the first page before any
    map_last: String,
    /// Next page of the location listing, if known
    map_next: Option<String>,
    /// Previous page of the location listing, if known
    map_prev: Option<String>,
    /// Caught pokemon, unique, in catch order
    caught: Vec<String>,
    /// Source of catch rolls
    rng: StdRng,
}

impl Session {
    /// Creates a session with an HTTP-backed client and starts its cache reaper
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &StartupConfig) -> Self {
        Self::with_client(CachedClient::new(&config.cache), &config.base_url)
    }

    /// Creates a session around an existing client
    ///
    /// A trailing slash on `base_url` is dropped so request keys have one form.
    pub fn with_client(client: CachedClient, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client,
            map_last: location_areas_url(&base_url),
            base_url,
            map_next: None,
            map_prev: None,
            caught: Vec::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replaces the catch RNG with a seeded one for reproducible rolls
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cached client shared by all commands; `entries` reads its store
    pub fn client(&self) -> &CachedClient {
        &self.client
    }

    /// Fetches `url` through the cache and decodes the JSON body
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SessionError> {
        let body = self.client.fetch_or_serve(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// URL the next `map` should show
    pub fn next_page_url(&self) -> String {
        self.map_next.clone().unwrap_or_else(|| self.map_last.clone())
    }

    /// URL the next `mapb` should show
    pub fn previous_page_url(&self) -> String {
        self.map_prev.clone().unwrap_or_else(|| self.map_last.clone())
    }

    /// Records the page just shown and its neighbours
    pub fn set_page(&mut self, shown: String, next: Option<String>, previous: Option<String>) {
        self.map_last = shown;
        self.map_next = next;
        self.map_prev = previous;
    }

    /// Rolls a uniform value in `[0, 1)`
    pub fn roll(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Adds `name` to the pokedex unless it is already there
    ///
    /// Returns `true` if the pokemon was newly added.
    pub fn add_caught(&mut self, name: &str) -> bool {
        if self.caught.iter().any(|caught| caught == name) {
            return false;
        }
        self.caught.push(name.to_string());
        true
    }

    /// Caught pokemon in catch order
    pub fn caught(&self) -> &[String] {
        &self.caught
    }

    /// Stops background work owned by the session
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

/// Errors from fetching and decoding an API resource
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The request failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The body was not the expected JSON
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
