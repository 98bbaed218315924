//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and key validation.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the PUT operation (POST /api/lru)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value; `null` when omitted
/// - `ttl_seconds`: Optional TTL; absent, zero or negative means the default
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    #[serde(default)]
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

impl PutRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }

    /// TTL to store the entry with, falling back to `default_ttl`.
    pub fn effective_ttl(&self, default_ttl: Duration) -> Duration {
        self.ttl_seconds
            .and_then(|secs| u64::try_from(secs).ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(default_ttl)
    }
}

/// Validates a cache key supplied in a body or path.
///
/// Returns an error message if the key is blank or too long.
pub fn validate_key(key: &str) -> Option<String> {
    if key.trim().is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
