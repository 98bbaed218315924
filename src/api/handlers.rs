//! API Handlers
//!
//! HTTP request handlers translating requests into cache engine calls.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, GetAllResponse, GetResponse, PingResponse, PutRequest, PutResponse,
    StatsResponse,
};

/// Cache of arbitrary JSON values served by the API.
pub type JsonCache = SharedCache<Value>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The cache engine
    pub cache: Arc<JsonCache>,
    /// TTL used when a PUT supplies none
    pub default_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: JsonCache, default_ttl: Duration) -> Self {
        Self {
            cache: Arc::new(cache),
            default_ttl,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SharedCache::new(config.cache_size), config.default_cache_ttl)
    }
}

/// Handler for GET /api/ping
pub async fn ping_handler() -> Json<PingResponse> {
    info!("health check");
    Json(PingResponse::healthy())
}

/// Handler for POST /api/lru
///
/// Stores a value under a key with an optional TTL in seconds.
pub async fn put_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PutResponse>)> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("failed to decode put request body: {}", rejection.body_text());
        CacheError::InvalidRequest(rejection.body_text())
    })?;

    if let Some(error_msg) = req.validate() {
        warn!("rejected put request: {}", error_msg);
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.effective_ttl(state.default_ttl);
    state.cache.put(req.key.clone(), req.value, ttl).await;
    debug!(key = %req.key, ttl_secs = ttl.as_secs(), "stored key");

    Ok((StatusCode::CREATED, Json(PutResponse::new(req.key))))
}

/// Handler for GET /api/lru/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    check_key(&key)?;

    let (value, expires_at) = state.cache.get(&key).await.map_err(|err| {
        warn!(key = %key, "failed to get key: {}", err);
        err
    })?;

    Ok(Json(GetResponse::new(key, value, expires_at)))
}

/// Handler for GET /api/lru
///
/// Returns every live entry, or 204 when there is none.
pub async fn get_all_handler(State(state): State<AppState>) -> Response {
    let (keys, values) = state.cache.get_all().await;

    if keys.is_empty() {
        info!("cache is empty");
        return StatusCode::NO_CONTENT.into_response();
    }

    Json(GetAllResponse::new(keys, values)).into_response()
}

/// Handler for DELETE /api/lru/:key
pub async fn evict_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    check_key(&key)?;

    state.cache.evict(&key).await.map_err(|err| {
        warn!(key = %key, "failed to evict key: {}", err);
        err
    })?;
    debug!(key = %key, "evicted key");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/lru
pub async fn evict_all_handler(State(state): State<AppState>) -> StatusCode {
    state.cache.evict_all().await;
    debug!("evicted all keys");
    StatusCode::NO_CONTENT
}

/// Handler for GET /api/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(error_msg) => {
            warn!("rejected key: {}", error_msg);
            Err(CacheError::InvalidRequest(error_msg))
        }
        None => Ok(()),
    }
}
