//! LRU TTL Cache - An in-memory key/value cache server
//!
//! Bounded capacity with least-recently-used eviction and per-entry
//! time-to-live, expired lazily on access.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::SharedCache;
pub use config::Config;
