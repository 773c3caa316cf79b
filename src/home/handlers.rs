use axum::extract::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::auth::AuthedUser;
use crate::common::AppState;

pub const APP_NAME: &str = "FootMatch";

#[derive(Serialize, Debug)]
pub struct HomeResponse {
    pub app: &'static str,
    pub authenticated: bool,
    pub name: Option<String>,
    pub google_login_enabled: bool,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub db_ok: bool,
}

/// GET / and GET /home
pub async fn home(
    Extension(state): Extension<Arc<AppState>>,
    authed: Option<AuthedUser>,
) -> Json<HomeResponse> {
    Json(HomeResponse {
        app: APP_NAME,
        authenticated: authed.is_some(),
        name: authed.and_then(|a| a.name),
        google_login_enabled: state.oauth.is_some(),
    })
}

/// GET /health
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    let db_ok = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "Health check database query failed");
            false
        }
    };

    Json(HealthResponse { status: "ok", db_ok })
}
