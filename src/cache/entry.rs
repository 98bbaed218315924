//! Cache Entry Module
//!
//! Defines a single cached entry and its staleness rule.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A key, its opaque value and the absolute instant it stops being live.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The key this entry is indexed under
    pub key: String,
    /// The stored payload, never inspected by the cache
    pub value: V,
    /// Expiration instant; the entry is stale at or after it
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    pub fn new(key: String, value: V, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            expires_at: expiry_after(now, ttl),
        }
    }

    // == Is Stale ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry whose `expires_at` equals `now` is stale,
    /// so a zero TTL produces an entry that is never observed as live.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    // == Refresh ==
    /// Replaces the value and restarts the TTL from `now`.
    pub fn refresh(&mut self, value: V, ttl: Duration, now: DateTime<Utc>) {
        self.value = value;
        self.expires_at = expiry_after(now, ttl);
    }
}

// == Utility Functions ==
/// Computes `now + ttl`, saturating at the latest representable instant.
pub fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
