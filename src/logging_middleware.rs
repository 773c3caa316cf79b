// src/logging_middleware.rs
//! Per-request access log: method, path, status and latency.
//!
//! Bodies, query strings and headers are never logged; they carry passwords,
//! OAuth codes and session cookies.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(method = %method, path = %path, status = status.as_u16(), latency_ms, "Request failed");
    } else {
        info!(method = %method, path = %path, status = status.as_u16(), latency_ms, "Request handled");
    }

    response
}
