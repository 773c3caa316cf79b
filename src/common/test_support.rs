//! Shared fixtures for unit tests

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use super::config::AppConfig;
use super::id_generator::generate_raw_id;
use super::migrations::run_migrations;
use super::state::AppState;
use crate::services::google::GoogleError;
use crate::services::{GoogleIdentity, OAuthProvider};

pub const TEST_SECRET: &str = "test-secret-key-that-is-long-enough-for-cookies";

/// In-memory database with the production schema.
///
/// A single connection: every `sqlite::memory:` connection is its own database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    run_migrations(&pool, false).await.unwrap();

    pool
}

/// File-backed database shared by several pooled connections.
///
/// Lets writers on different connections contend for the same rows.
/// Call `remove_test_db` with the returned path when done.
pub async fn setup_shared_test_db(connections: u32) -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("footmatch-test-{}.db", generate_raw_id(10)));

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
        .unwrap()
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .max_connections(connections)
        .min_connections(connections)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool, false).await.unwrap();

    (pool, path)
}

pub async fn remove_test_db(pool: SqlitePool, path: PathBuf) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        secret_key: TEST_SECRET.to_string(),
        google: None,
        insecure_transport: true,
        session_ttl_hours: 24,
        reset_db: false,
        port: 0,
    }
}

pub async fn test_state(oauth: Option<Arc<dyn OAuthProvider>>) -> Arc<AppState> {
    let pool = setup_test_db().await;
    Arc::new(AppState::new(pool, test_config(), oauth))
}

// ----------------------------------------------------------------------------
// Router-level helpers
// ----------------------------------------------------------------------------

/// OAuth provider that accepts the code "good" and returns a fixed identity
pub struct StubProvider {
    pub identity: GoogleIdentity,
}

impl StubProvider {
    pub fn new(email: &str) -> Self {
        Self {
            identity: GoogleIdentity {
                google_id: "google-sub-1".to_string(),
                email: email.to_string(),
                name: Some("Ada Lovelace".to_string()),
                given_name: Some("Ada".to_string()),
                family_name: Some("Lovelace".to_string()),
                picture: Some("https://example.com/ada.png".to_string()),
            },
        }
    }
}

#[async_trait]
impl OAuthProvider for StubProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://accounts.example.com/auth?state={}", state)
    }

    async fn authenticate(&self, code: &str) -> Result<GoogleIdentity, GoogleError> {
        if code == "good" {
            Ok(self.identity.clone())
        } else {
            Err(GoogleError::InvalidToken("bad code".to_string()))
        }
    }
}

pub async fn test_app(oauth: Option<Arc<dyn OAuthProvider>>) -> (Router, Arc<AppState>) {
    let state = test_state(oauth).await;
    (crate::build_router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// `Cookie` header value replaying every non-empty cookie the response set
pub fn cookies_from(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter(|pair| pair.split_once('=').map_or(false, |(_, value)| !value.is_empty()))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register through the router and return the session cookie header
pub async fn sign_up(app: &Router, name: &str, email: &str, password: &str) -> String {
    let body = format!(
        "name={}&surname=Tester&email={}&password={}&password_confirm={}",
        urlencoding::encode(name),
        urlencoding::encode(email),
        urlencoding::encode(password),
        urlencoding::encode(password)
    );
    let response = send(app, post_form("/sign-up", &body, None)).await;
    assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
    cookies_from(&response)
}
