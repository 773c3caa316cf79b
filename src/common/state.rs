// Application state shared across all modules

use axum_extra::extract::cookie::Key;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::config::AppConfig;
use crate::services::OAuthProvider;

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    /// Signing key for session and OAuth-state cookies, derived from SECRET_KEY
    pub cookie_key: Key,
    /// `None` when Google credentials are not configured
    pub oauth: Option<Arc<dyn OAuthProvider>>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig, oauth: Option<Arc<dyn OAuthProvider>>) -> Self {
        let cookie_key = Key::derive_from(config.secret_key.as_bytes());
        Self {
            db,
            config: Arc::new(config),
            cookie_key,
            oauth,
        }
    }
}
