//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET|POST /sign-up` - Local registration
/// - `GET|POST /login` - Local login
/// - `GET /google-login` - Start Google OAuth
/// - `GET /callback` - Google OAuth redirect target
/// - `GET /dashboard` - Current user's profile and games
/// - `GET /logout` - Clear the session
pub fn auth_routes() -> Router {
    Router::new()
        .route("/sign-up", get(handlers::sign_up_form).post(handlers::sign_up))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/google-login", get(handlers::google_login))
        .route("/callback", get(handlers::google_callback))
        .route("/dashboard", get(handlers::dashboard))
        .route("/logout", get(handlers::logout))
}
