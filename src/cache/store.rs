//! Shared TTL store for raw response bodies
//!
//! Every read and write goes through a single exclusive lock. The number of
//! entries is bounded by the distinct endpoints queried in one session, so
//! contention stays low.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

/// A single cached response body
#[derive(Debug)]
struct CacheEntry {
    /// Raw response payload, shared with readers without copying
    body: Arc<[u8]>,
    /// When the entry was inserted
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

type Entries = Arc<Mutex<HashMap<String, CacheEntry>>>;

/// Thread-safe map from request URL to response body
///
/// Clones share the same underlying map. The TTL is fixed at construction and
/// applies to every entry.
#[derive(Debug, Clone)]
pub struct CacheStore {
    entries: Entries,
    ttl: Duration,
}

impl CacheStore {
    /// Creates an empty store whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up the body stored under `key`
    ///
    /// Returns `None` if the key was never inserted or has already been reaped.
    pub fn get(&self, key: &str) -> Option<Arc<[u8]>> {
        self.entries
            .lock()
            .get(key)
            .map(|entry| Arc::clone(&entry.body))
    }

    /// Inserts or overwrites the entry for `key`, stamped with the current time
    pub fn add(&self, key: impl Into<String>, body: impl Into<Arc<[u8]>>) {
        let entry = CacheEntry {
            body: body.into(),
            created_at: Instant::now(),
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Sorted snapshot of the keys currently held
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Removes every entry older than the TTL in a single locked sweep
    ///
    /// Returns the number of entries evicted.
    pub fn reap(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, ttl));
        before - entries.len()
    }

    /// Non-owning handle used by the background reaper
    pub(crate) fn downgrade(&self) -> WeakStore {
        WeakStore {
            entries: Arc::downgrade(&self.entries),
            ttl: self.ttl,
        }
    }
}

/// Weak reference to a `CacheStore` that does not keep the map alive
#[derive(Debug, Clone)]
pub(crate) struct WeakStore {
    entries: Weak<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl WeakStore {
    /// Recovers the store if it is still alive
    pub(crate) fn upgrade(&self) -> Option<CacheStore> {
        self.entries.upgrade().map(|entries| CacheStore {
            entries,
            ttl: self.ttl,
        })
    }
}
