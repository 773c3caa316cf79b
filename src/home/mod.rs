//! Landing page and health check

pub mod handlers;


use axum::{routing::get, Router};

pub fn home_routes() -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/home", get(handlers::home))
        .route("/health", get(handlers::health))
}
