//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    evict_all_handler, evict_handler, get_all_handler, get_handler, ping_handler, put_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/ping` - Health check
/// - `POST /api/lru` - Store a value
/// - `GET /api/lru` - List every live entry
/// - `DELETE /api/lru` - Drop every entry
/// - `GET /api/lru/:key` - Retrieve a value by key
/// - `DELETE /api/lru/:key` - Remove a key
/// - `GET /api/stats` - Cache counters
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ping", get(ping_handler))
        .route(
            "/api/lru",
            get(get_all_handler)
                .post(put_handler)
                .delete(evict_all_handler),
        )
        .route("/api/lru/:key", get(get_handler).delete(evict_handler))
        .route("/api/stats", get(stats_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
