use crate::error::ApiError;
use axum::http::{Method, Uri};

/// Answer for any method/path pair without a route
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {} {}", method, uri.path()))
}
