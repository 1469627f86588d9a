//! HTTP request handlers for the Rankboard API
//!
//! Handlers translate query-string parameters into ranking index calls and
//! JSON-encode the results. Malformed parameters fall back to defaults rather
//! than rejecting the request.

use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::core::types::{EntityId, LeaderboardEntry, ScoreDomain};
use crate::core::AppState;
use crate::ranking::IndexStats;
use crate::system::health::{self, HealthStatus};
use crate::system::metrics::{self, Metrics};

/// Entries returned by `/leaderboard` when no usable limit is given
pub const DEFAULT_LIMIT: usize = 50;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Whether the operation was successful (always false)
    pub success: bool,
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(error: String) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// `/leaderboard` query string
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Raw limit; parsed leniently
    pub limit: Option<String>,
}

/// `/search` query string
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Raw name prefix, passed through unmodified
    pub query: Option<String>,
}

/// System information and capabilities
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Service name
    pub name: &'static str,
    /// Service version
    pub version: &'static str,
    /// Score domain of the index
    pub domain: ScoreDomain,
    /// Index size figures
    pub stats: IndexStats,
    /// Supported query kinds
    pub capabilities: Vec<&'static str>,
}

/// Resolve the raw `limit` parameter: missing or unparsable means
/// [`DEFAULT_LIMIT`], negative means zero.
pub fn parse_limit(raw: Option<&str>) -> usize {
    match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(limit)) if limit <= 0 => 0,
        Some(Ok(limit)) => usize::try_from(limit).unwrap_or(usize::MAX),
        _ => DEFAULT_LIMIT,
    }
}

/// Root handler listing the endpoints
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": crate::NAME,
        "version": crate::VERSION,
        "endpoints": {
            "leaderboard": "GET /leaderboard?limit=N",
            "entry": "GET /leaderboard/{id}",
            "search": "GET /search?query=PREFIX",
            "health": "GET /health",
            "info": "GET /info",
            "metrics": "GET /metrics",
        }
    }))
}

/// Top entries by score
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardEntry>> {
    let limit = parse_limit(params.limit.as_deref());
    let entries = state.index.top(limit);
    Metrics::global().top_queries.inc();
    Json(entries)
}

/// Entries whose name starts with the query
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<LeaderboardEntry>> {
    let entries = state.index.search(params.query.as_deref().unwrap_or_default());
    Metrics::global().search_queries.inc();
    Json(entries)
}

/// Current rank of one entity
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EntityId>,
) -> Result<Json<LeaderboardEntry>, (StatusCode, Json<ErrorResponse>)> {
    state.index.get(id).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(format!("Entity {} not found", id))),
        )
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(health::check(&state.index, state.started_at))
}

/// System information endpoint
pub async fn system_info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: crate::NAME,
        version: crate::VERSION,
        domain: state.index.domain(),
        stats: state.index.stats(),
        capabilities: vec!["top_k", "prefix_search", "competition_rank"],
    })
}

/// Prometheus exposition endpoint
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    Metrics::global().entity_count.set(state.index.len() as i64);
    match metrics::collect_metrics() {
        Ok(body) => (
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
