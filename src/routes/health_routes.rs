use crate::handlers::{get_api_health, not_found};
use crate::state::AppState;
use axum::{routing::get, Router};

/// Liveness and readiness probes
pub fn create_health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(get_api_health).fallback(not_found))
        .route("/ready", get(|| async { "Ready" }).fallback(not_found))
        .route("/live", get(|| async { "Live" }).fallback(not_found))
}
