//! Cache Module
//!
//! Bounded in-memory caching with LRU eviction and lazy TTL expiration.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyList;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;
