// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod games;
mod home;
mod logging_middleware;
mod services;

use auth::session::SessionStore;
use common::config::log_config_summary;
use common::{AppConfig, AppState};
use services::{GoogleService, OAuthProvider};

/// Compose every route with the shared state and middleware layers
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(home::home_routes())
        .merge(auth::auth_routes())
        .merge(games::games_routes())
        .layer(middleware::from_fn(logging_middleware::log_request))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Make sure the directory holding a file-backed SQLite database exists
async fn ensure_database_dir(database_url: &str) -> std::io::Result<()> {
    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env()?;
    log_config_summary(&config);

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    ensure_database_dir(&config.database_url).await?;

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool, config.reset_db).await?;

    match SessionStore::new(pool.clone(), config.session_ttl_hours)
        .purge_expired()
        .await
    {
        Ok(removed) => info!(removed, "Expired sessions purged"),
        Err(e) => warn!(error = %e, "Failed to purge expired sessions"),
    }

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let oauth: Option<Arc<dyn OAuthProvider>> = match config.google.clone() {
        Some(google) => {
            info!("GoogleService initialized");
            Some(Arc::new(GoogleService::new(google)))
        }
        None => {
            warn!("GOOGLE_CLIENT_ID not set - Google login disabled");
            None
        }
    };

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = config.port;
    let app = build_router(Arc::new(AppState::new(pool, config, oauth)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
