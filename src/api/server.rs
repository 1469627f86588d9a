//! HTTP server implementation for the Rankboard API

use axum::{http::Method, routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::core::error::{Error, Result};
use crate::core::AppState;

/// Creates the application router with all routes and middleware
pub fn create_app(app_state: Arc<AppState>) -> Router {
    // Permissive cross-origin access for browser dashboards
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    let mut router = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/leaderboard", get(handlers::leaderboard))
        .route("/leaderboard/{id}", get(handlers::get_entry))
        .route("/search", get(handlers::search))
        .route("/health", get(handlers::health_check))
        .route("/info", get(handlers::system_info));

    if app_state.config.metrics.enable_prometheus {
        router = router.route("/metrics", get(handlers::metrics_handler));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(app_state)
}

/// Bind the configured address and serve until `shutdown` resolves.
///
/// Failing to bind is the only fatal error of the service.
pub async fn start_api_server<F>(app_state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = app_state.config.server.http_addr;
    info!("Starting Rankboard API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);
    info!("Leaderboard available at http://{}/leaderboard", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, create_app(app_state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
