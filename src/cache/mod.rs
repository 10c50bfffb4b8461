//! In-memory response cache for PokeAPI requests
//!
//! Responses are keyed by their full request URL and kept for a fixed TTL.
//! A background reaper evicts expired entries on its own tick, so callers never
//! have to check staleness themselves. `CachedClient` is the entry point used by
//! the command layer: it serves cached bodies and falls back to the network on
//! a miss.

mod client;
mod fetcher;
mod reaper;
mod store;

pub use client::{CacheConfig, CachedClient};
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use reaper::{Reaper, ReaperHandle};
pub use store::CacheStore;
