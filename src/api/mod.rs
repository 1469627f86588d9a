//! # API Module
//!
//! HTTP interface over the ranking index.
//!
//! ## Endpoints
//! - `GET /leaderboard?limit=N` - top N entries (default 50)
//! - `GET /leaderboard/{id}` - current rank of one entity
//! - `GET /search?query=PREFIX` - case-insensitive name prefix search
//! - `GET /health` - health check
//! - `GET /info` - score domain and index size
//! - `GET /metrics` - Prometheus metrics, when enabled

/// HTTP request handlers
pub mod handlers;

/// HTTP server implementation
pub mod server;

// Re-export commonly used items
pub use handlers::*;
pub use server::{create_app, start_api_server};
