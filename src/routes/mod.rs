pub mod design_routes;
pub mod health_routes;

pub use design_routes::*;
pub use health_routes::*;

use crate::handlers::not_found;
use crate::middleware::{cors_layer, logging};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::ServiceBuilder;

/// The complete application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_health_routes())
        .merge(create_design_routes(state.clone()))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer())
                .layer(axum::middleware::from_fn(logging::log_requests))
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .with_state(state)
}
