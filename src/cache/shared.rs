//! Shared Cache Module
//!
//! The engine handed to request handlers: a [`CacheStore`] behind a single
//! exclusive lock.

use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::error::Result;

// == Shared Cache ==
/// Thread-safe LRU+TTL cache.
///
/// Every operation, lookups included, holds the one mutex for its whole
/// duration. Lookups reorder recency and purge stale entries, so there is no
/// shared read mode. The lock is never held across an await point; a caller
/// that drops the future while waiting for the lock abandons the call with no
/// effect.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Mutex<CacheStore<V>>,
    capacity: NonZeroUsize,
}

impl<V> SharedCache<V> {
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(CacheStore::new(capacity)),
            capacity,
        }
    }

    /// Inserts or updates `key` so that it expires `ttl` from now.
    pub async fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.inner.lock().await.put(key.into(), value, ttl);
    }

    /// Removes `key` regardless of staleness and returns its value.
    pub async fn evict(&self, key: &str) -> Result<V> {
        self.inner.lock().await.evict(key)
    }

    /// Drops every entry.
    pub async fn evict_all(&self) {
        self.inner.lock().await.evict_all();
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    /// Number of entries physically held, including not yet purged stale ones.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl<V: Clone> SharedCache<V> {
    /// Looks up `key`; see [`CacheStore::get_at`] for the expiry rules.
    pub async fn get(&self, key: &str) -> Result<(V, DateTime<Utc>)> {
        self.inner.lock().await.get(key)
    }

    /// Returns live keys and values, most recently used first.
    pub async fn get_all(&self) -> (Vec<String>, Vec<V>) {
        self.inner.lock().await.get_all()
    }
}
