//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /api/ping` - Health check
//! - `POST /api/lru` - Store a value under a key
//! - `GET /api/lru/:key` - Retrieve a value by key
//! - `GET /api/lru` - List every live entry
//! - `DELETE /api/lru/:key` - Remove a key
//! - `DELETE /api/lru` - Remove every key
//! - `GET /api/stats` - Cache counters

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
