//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for a single lookup (GET /api/lru/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
    /// Expiration instant as Unix seconds
    pub expires_at: i64,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value, expires_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            value,
            expires_at: expires_at.timestamp(),
        }
    }
}

/// Response body for the snapshot (GET /api/lru)
///
/// `keys[i]` pairs with `values[i]`, most recently used first.
#[derive(Debug, Clone, Serialize)]
pub struct GetAllResponse {
    pub keys: Vec<String>,
    pub values: Vec<Value>,
}

impl GetAllResponse {
    pub fn new(keys: Vec<String>, values: Vec<Value>) -> Self {
        Self { keys, values }
    }
}

/// Response body for the PUT operation (POST /api/lru)
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: String,
}

impl PutResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored successfully", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /api/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for the ping endpoint (GET /api/ping)
#[derive(Debug, Clone, Serialize)]
pub struct PingResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current time, RFC 3339
    pub timestamp: DateTime<Utc>,
}

impl PingResponse {
    /// Creates a PingResponse stamped with the current time
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
