use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, info, warn};

const REDACTED_HEADERS: [&str; 3] = ["authorization", "cookie", "set-cookie"];

/// Log every request with its status and latency
pub async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    info!("Incoming request: {} {}", method, uri);

    for (name, value) in req.headers() {
        if REDACTED_HEADERS.contains(&name.as_str()) {
            continue;
        }
        match value.to_str() {
            Ok(value_str) => debug!("Header: {}: {}", name, value_str),
            Err(_) => debug!("Header: {}: (binary data)", name),
        }
    }

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();

    if status.is_server_error() {
        error!("{} {} -> {} in {}ms", method, uri, status, elapsed_ms);
    } else if status.is_client_error() {
        warn!("{} {} -> {} in {}ms", method, uri, status, elapsed_ms);
    } else {
        info!("{} {} -> {} in {}ms", method, uri, status, elapsed_ms);
    }

    response
}
