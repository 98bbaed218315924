//! Cache Store Module
//!
//! Bounded key/value structure combining a key index with an LRU recency list
//! and lazy TTL expiration. Not synchronized; see [`SharedCache`] for the
//! locked engine used by request handlers.
//!
//! [`SharedCache`]: crate::cache::SharedCache

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::{CacheEntry, CacheStats, RecencyList};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// LRU cache with per-entry TTL.
///
/// Every key in `index` names exactly one occupied slot in `recency`, and
/// every entry in `recency` is indexed under its own key. The recency list
/// never holds more than `capacity` entries. Stale entries stay physically
/// present until an access finds them.
#[derive(Debug)]
pub struct CacheStore<V> {
    index: HashMap<String, usize>,
    recency: RecencyList<CacheEntry<V>>,
    stats: CacheStats,
    capacity: NonZeroUsize,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity.get()),
            recency: RecencyList::with_capacity(capacity.get()),
            stats: CacheStats::new(capacity.get()),
            capacity,
        }
    }

    // == Put ==
    /// Inserts or updates `key`, expiring `ttl` from now.
    pub fn put(&mut self, key: String, value: V, ttl: Duration) {
        self.put_at(key, value, ttl, Utc::now());
    }

    /// Inserts or updates `key` as of the instant `now`.
    ///
    /// An existing entry, live or stale, is overwritten in place and becomes
    /// most recently used without any eviction. A new key arriving at full
    /// capacity evicts the least recently used entry first, whether or not
    /// that entry is already stale.
    pub fn put_at(&mut self, key: String, value: V, ttl: Duration, now: DateTime<Utc>) {
        if let Some(&slot) = self.index.get(&key) {
            if let Some(entry) = self.recency.get_mut(slot) {
                entry.refresh(value, ttl, now);
                self.recency.move_to_front(slot);
                return;
            }
            self.index.remove(&key);
        }

        if self.recency.len() >= self.capacity.get() {
            self.evict_least_recent();
        }

        let entry = CacheEntry::new(key.clone(), value, ttl, now);
        let slot = self.recency.push_front(entry);
        self.index.insert(key, slot);
    }

    // == Get All ==
    /// Returns live keys and values, most recently used first.
    pub fn get_all(&mut self) -> (Vec<String>, Vec<V>)
    where
        V: Clone,
    {
        self.get_all_at(Utc::now())
    }

    /// Snapshots live entries as of `now`, purging stale ones along the way.
    ///
    /// Recency order is left untouched; `keys[i]` pairs with `values[i]`.
    pub fn get_all_at(&mut self, now: DateTime<Utc>) -> (Vec<String>, Vec<V>)
    where
        V: Clone,
    {
        let mut keys = Vec::with_capacity(self.recency.len());
        let mut values = Vec::with_capacity(self.recency.len());

        let mut cursor = self.recency.front();
        while let Some(slot) = cursor {
            cursor = self.recency.next_of(slot);

            match self.recency.get(slot) {
                Some(entry) if !entry.is_stale(now) => {
                    keys.push(entry.key.clone());
                    values.push(entry.value.clone());
                }
                Some(_) => {
                    self.purge(slot);
                    self.stats.record_expiration();
                }
                None => {}
            }
        }

        (keys, values)
    }

    // == Evict ==
    /// Removes `key` regardless of staleness and returns its value.
    pub fn evict(&mut self, key: &str) -> Result<V> {
        self.index
            .remove(key)
            .and_then(|slot| self.recency.remove(slot))
            .map(|entry| entry.value)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    // == Evict All ==
    /// Drops every entry, live or stale.
    pub fn evict_all(&mut self) {
        self.index.clear();
        self.recency.clear();
    }

    // == Stats ==
    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.recency.len());
        stats
    }

    // == Length ==
    /// Number of entries physically held, including stale ones.
    pub fn len(&self) -> usize {
        self.recency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recency.is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    // == Iter ==
    /// Iterates entries most recently used first without touching recency
    /// or purging stale entries.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry<V>> {
        self.recency.iter()
    }

    // == Internal Helpers ==
    fn evict_least_recent(&mut self) {
        if let Some(slot) = self.recency.back() {
            if self.purge(slot) {
                self.stats.record_eviction();
            }
        }
    }

    /// Removes the entry in `slot` from both the list and the index.
    fn purge(&mut self, slot: usize) -> bool {
        match self.recency.remove(slot) {
            Some(entry) => {
                self.index.remove(&entry.key);
                true
            }
            None => false,
        }
    }
}

impl<V: Clone> CacheStore<V> {
    // == Get ==
    /// Looks up `key`, returning its value and expiration instant.
    pub fn get(&mut self, key: &str) -> Result<(V, DateTime<Utc>)> {
        self.get_at(key, Utc::now())
    }

    /// Looks up `key` as of `now`.
    ///
    /// A live hit becomes most recently used. A stale hit is purged and
    /// reported as [`CacheError::Expired`]; a later lookup of the same key
    /// then reports [`CacheError::NotFound`].
    pub fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Result<(V, DateTime<Utc>)> {
        let Some(&slot) = self.index.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        match self.recency.get(slot) {
            Some(entry) if !entry.is_stale(now) => {
                let hit = (entry.value.clone(), entry.expires_at);
                self.recency.move_to_front(slot);
                self.stats.record_hit();
                Ok(hit)
            }
            Some(_) => {
                self.purge(slot);
                self.stats.record_expiration();
                self.stats.record_miss();
                Err(CacheError::Expired(key.to_string()))
            }
            None => {
                self.index.remove(key);
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const HOUR: Duration = Duration::from_secs(3600);

    fn store(capacity: usize) -> CacheStore<String> {
        CacheStore::new(NonZeroUsize::new(capacity).unwrap())
    }

    fn keys(store: &CacheStore<String>) -> Vec<String> {
        store.iter().map(|entry| entry.key.clone()).collect()
    }

    fn secs(n: i64) -> chrono::Duration {
        chrono::Duration::seconds(n)
    }

    #[test]
    fn test_store_new() {
        let store = store(4);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity().get(), 4);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = store(2);

        let before = Utc::now();
        store.put("key1".to_string(), "value1".to_string(), HOUR);
        let (value, expires_at) = store.get("key1").unwrap();

        assert_eq!(value, "value1");
        assert!(expires_at >= before + secs(3599));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(2);
        assert!(matches!(store.get("missing"), Err(CacheError::NotFound(_))));
    }

    // Scenario: a third key evicts the first.
    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(2);

        store.put("k1".to_string(), "v1".to_string(), HOUR);
        store.put("k2".to_string(), "v2".to_string(), HOUR);
        store.put("k3".to_string(), "v3".to_string(), HOUR);

        assert_eq!(store.len(), 2);
        assert!(matches!(store.get("k1"), Err(CacheError::NotFound(_))));
        assert_eq!(store.get("k2").unwrap().0, "v2");
        assert_eq!(store.get("k3").unwrap().0, "v3");
        assert_eq!(store.stats().evictions, 1);
    }

    // Scenario: an expired key reports Expired once, then NotFound.
    #[test]
    fn test_store_expired_then_not_found() {
        let mut store = store(2);
        let now = Utc::now();

        store.put_at("k1".to_string(), "v1".to_string(), Duration::from_secs(1), now);

        let later = now + secs(2);
        assert!(matches!(store.get_at("k1", later), Err(CacheError::Expired(_))));
        assert!(matches!(store.get_at("k1", later), Err(CacheError::NotFound(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_ttl_expiration_wall_clock() {
        let mut store = store(2);

        store.put("k1".to_string(), "v1".to_string(), Duration::from_secs(1));
        assert!(store.get("k1").is_ok());

        sleep(Duration::from_millis(1100));

        assert!(matches!(store.get("k1"), Err(CacheError::Expired(_))));
    }

    // Scenario: get_all lists most recent first.
    #[test]
    fn test_store_get_all_recency_order() {
        let mut store = store(2);

        store.put("k1".to_string(), "v1".to_string(), HOUR);
        store.put("k2".to_string(), "v2".to_string(), HOUR);

        let (keys, values) = store.get_all();
        assert_eq!(keys, vec!["k2", "k1"]);
        assert_eq!(values, vec!["v2", "v1"]);
    }

    // Scenario: evict returns the value once.
    #[test]
    fn test_store_evict() {
        let mut store = store(2);

        store.put("k1".to_string(), "v1".to_string(), HOUR);

        assert_eq!(store.evict("k1").unwrap(), "v1");
        assert!(matches!(store.get("k1"), Err(CacheError::NotFound(_))));
        assert!(matches!(store.evict("k1"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_evict_ignores_staleness() {
        let mut store = store(2);
        let now = Utc::now();

        store.put_at("k1".to_string(), "v1".to_string(), Duration::ZERO, now);

        assert_eq!(store.evict("k1").unwrap(), "v1");
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite_is_not_insert() {
        let mut store = store(2);

        store.put("k1".to_string(), "v1".to_string(), HOUR);
        store.put("k2".to_string(), "v2".to_string(), HOUR);
        store.put("k1".to_string(), "v1b".to_string(), HOUR);

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(keys(&store), vec!["k1", "k2"]);
        assert_eq!(store.get("k1").unwrap().0, "v1b");
    }

    #[test]
    fn test_store_overwrite_revives_stale_entry() {
        let mut store = store(2);
        let now = Utc::now();

        store.put_at("k1".to_string(), "old".to_string(), Duration::from_secs(1), now);
        store.put_at("k1".to_string(), "new".to_string(), HOUR, now + secs(5));

        let (value, expires_at) = store.get_at("k1", now + secs(6)).unwrap();
        assert_eq!(value, "new");
        assert_eq!(expires_at, now + secs(5) + secs(3600));
    }

    #[test]
    fn test_store_get_refreshes_recency() {
        let mut store = store(3);

        store.put("k1".to_string(), "v1".to_string(), HOUR);
        store.put("k2".to_string(), "v2".to_string(), HOUR);
        store.put("k3".to_string(), "v3".to_string(), HOUR);

        store.get("k1").unwrap();
        assert_eq!(keys(&store), vec!["k1", "k3", "k2"]);

        store.put("k4".to_string(), "v4".to_string(), HOUR);
        assert!(store.get("k1").is_ok());
        assert!(matches!(store.get("k2"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_capacity_evicts_stale_tail_as_eviction() {
        let mut store = store(2);
        let now = Utc::now();

        store.put_at("stale".to_string(), "s".to_string(), Duration::from_secs(1), now);
        store.put_at("live".to_string(), "l".to_string(), HOUR, now);
        store.put_at("fresh".to_string(), "f".to_string(), HOUR, now + secs(10));

        let stats = store.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.expirations, 0);
        assert_eq!(keys(&store), vec!["fresh", "live"]);
    }

    #[test]
    fn test_store_capacity_evicts_live_tail_over_stale_head() {
        let mut store = store(2);
        let now = Utc::now();

        store.put_at("live".to_string(), "l".to_string(), HOUR, now);
        store.put_at("stale".to_string(), "s".to_string(), Duration::from_secs(1), now);
        store.put_at("fresh".to_string(), "f".to_string(), HOUR, now + secs(10));

        assert_eq!(keys(&store), vec!["fresh", "stale"]);
    }

    #[test]
    fn test_store_zero_ttl_never_live() {
        let mut store = store(2);
        let now = Utc::now();

        store.put_at("k".to_string(), "v".to_string(), Duration::ZERO, now);

        let (keys, _) = store.get_all_at(now);
        assert!(keys.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_expiry_boundary() {
        let mut store = store(2);
        let now = Utc::now();

        store.put_at("k".to_string(), "v".to_string(), Duration::from_secs(10), now);

        assert!(store.get_at("k", now + secs(10) - chrono::Duration::milliseconds(1)).is_ok());
        assert!(matches!(
            store.get_at("k", now + secs(10)),
            Err(CacheError::Expired(_))
        ));
    }

    #[test]
    fn test_store_get_all_purges_stale() {
        let mut store = store(4);
        let now = Utc::now();

        store.put_at("a".to_string(), "1".to_string(), HOUR, now);
        store.put_at("b".to_string(), "2".to_string(), Duration::from_secs(1), now);
        store.put_at("c".to_string(), "3".to_string(), HOUR, now);
        store.put_at("d".to_string(), "4".to_string(), Duration::from_secs(1), now);

        let (keys, values) = store.get_all_at(now + secs(5));
        assert_eq!(keys, vec!["c", "a"]);
        assert_eq!(values, vec!["3", "1"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().expirations, 2);
        assert!(matches!(store.get("b"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_get_all_does_not_reorder() {
        let mut store = store(3);

        store.put("a".to_string(), "1".to_string(), HOUR);
        store.put("b".to_string(), "2".to_string(), HOUR);
        store.get_all();

        store.put("c".to_string(), "3".to_string(), HOUR);
        store.put("d".to_string(), "4".to_string(), HOUR);
        assert_eq!(keys(&store), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_store_evict_all_idempotent() {
        let mut store = store(2);

        store.evict_all();
        assert!(store.is_empty());

        store.put("k1".to_string(), "v1".to_string(), HOUR);
        store.put("k2".to_string(), "v2".to_string(), HOUR);
        store.evict_all();
        store.evict_all();

        let (keys, values) = store.get_all();
        assert!(keys.is_empty());
        assert!(values.is_empty());
        assert!(matches!(store.get("k1"), Err(CacheError::NotFound(_))));

        store.put("k3".to_string(), "v3".to_string(), HOUR);
        assert_eq!(store.get("k3").unwrap().0, "v3");
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(2);
        let now = Utc::now();

        store.put_at("k1".to_string(), "v1".to_string(), HOUR, now);
        store.put_at("k2".to_string(), "v2".to_string(), Duration::from_secs(1), now);
        store.get_at("k1", now).unwrap();
        let _ = store.get_at("missing", now);
        let _ = store.get_at("k2", now + secs(2));

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.capacity, 2);
    }

    #[test]
    fn test_store_capacity_one() {
        let mut store = store(1);

        store.put("a".to_string(), "1".to_string(), HOUR);
        store.put("b".to_string(), "2".to_string(), HOUR);
        store.put("b".to_string(), "3".to_string(), HOUR);

        assert_eq!(store.len(), 1);
        assert_eq!(keys(&store), vec!["b"]);
        assert_eq!(store.get("b").unwrap().0, "3");
    }
}
