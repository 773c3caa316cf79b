//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User database model
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub google_id: Option<String>,
    pub picture: Option<String>,
    pub created_at: Option<String>,
}

/// Server-side session row; the id travels in the signed session cookie
#[derive(FromRow, Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub google_id: Option<String>,
    pub created_at: String,
    pub expires_at: String,
}

/// POST /sign-up form body
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SignUpForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// POST /login form body
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query string Google appends to the redirect URI
#[derive(Deserialize, Debug)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /dashboard response
#[derive(Serialize, Debug)]
pub struct DashboardResponse {
    pub user: User,
    pub google_linked: bool,
    pub created_games: Vec<crate::games::models::GameSummary>,
    pub joined_games: Vec<crate::games::models::GameSummary>,
}
