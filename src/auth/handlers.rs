//! Authentication handlers

use axum::extract::{Extension, Form, Json, Query};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum_extra::extract::cookie::SignedCookieJar;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::extractors::{
    oauth_state_cookie, removal_cookie, session_cookie, AuthedUser, OAUTH_STATE_COOKIE,
    SESSION_COOKIE,
};
use super::models::{DashboardResponse, LoginForm, OAuthCallbackQuery, SignUpForm, User};
use super::services::UsersService;
use super::session::SessionStore;
use crate::common::{generate_token, safe_email_log, ApiError, AppState, FormDescriptor};
use crate::games::services::GamesService;

fn cookie_jar(state: &AppState, headers: &HeaderMap) -> SignedCookieJar {
    SignedCookieJar::from_headers(headers, state.cookie_key.clone())
}

/// Replace any session the browser already holds with a fresh one for `user`
async fn open_session(
    state: &AppState,
    jar: SignedCookieJar,
    user: &User,
) -> Result<SignedCookieJar, ApiError> {
    let store = SessionStore::from_state(state);

    if let Some(previous) = jar.get(SESSION_COOKIE) {
        store.delete_session(previous.value()).await?;
    }

    let session = store.create_session(user).await?;
    Ok(jar.add(session_cookie(
        session.id,
        state.config.secure_cookies(),
        state.config.session_ttl_hours,
    )))
}

/// GET /sign-up
pub async fn sign_up_form() -> Json<FormDescriptor> {
    Json(
        FormDescriptor::post("sign-up", "/sign-up")
            .field("name", "Name", "text")
            .field("surname", "Surname", "text")
            .field("email", "Email", "email")
            .field("password", "Password", "password")
            .field("password_confirm", "Confirm password", "password"),
    )
}

/// POST /sign-up
///
/// Creates a local account and logs it in. Redirects to `/dashboard`.
pub async fn sign_up(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<SignUpForm>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let user = UsersService::new(state.db.clone()).register(form).await?;
    let jar = open_session(&state, cookie_jar(&state, &headers), &user).await?;

    Ok((jar, Redirect::to("/dashboard")))
}

/// GET /login
pub async fn login_form() -> Json<FormDescriptor> {
    Json(
        FormDescriptor::post("login", "/login")
            .field("email", "Email", "email")
            .field("password", "Password", "password"),
    )
}

/// POST /login
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let user = UsersService::new(state.db.clone()).authenticate(&form).await?;
    let jar = open_session(&state, cookie_jar(&state, &headers), &user).await?;

    Ok((jar, Redirect::to("/dashboard")))
}

/// GET /logout
///
/// Never fails: the cookie is cleared even when the session row can't be deleted.
pub async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    authed: Option<AuthedUser>,
    headers: HeaderMap,
) -> (SignedCookieJar, Redirect) {
    if let Some(authed) = authed {
        match SessionStore::from_state(&state)
            .delete_session(&authed.session_id)
            .await
        {
            Ok(()) => info!(user = %safe_email_log(&authed.email), "User logged out"),
            Err(e) => error!(error = %e, "Failed to delete session on logout"),
        }
    }

    // Cleared even when the session was already gone
    let jar = cookie_jar(&state, &headers);
    (jar.remove(removal_cookie(SESSION_COOKIE)), Redirect::to("/home"))
}

/// GET /google-login - Start Google OAuth flow
pub async fn google_login(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let provider = state.oauth.as_ref().ok_or_else(|| {
        error!("Google login requested but GOOGLE_CLIENT_ID is not configured");
        ApiError::InternalServer("Google login is not configured".to_string())
    })?;

    let oauth_state = generate_token();
    SessionStore::from_state(&state)
        .store_oauth_state(&oauth_state)
        .await?;

    let auth_url = provider.authorization_url(&oauth_state);
    let jar = cookie_jar(&state, &headers)
        .add(oauth_state_cookie(oauth_state, state.config.secure_cookies()));

    info!("Redirecting to Google authorization page");
    Ok((jar, Redirect::to(&auth_url)))
}

/// GET /callback - Handle OAuth callback from Google
///
/// The `state` query value must equal the signed cookie and still be stored
/// server-side. A mismatch or any token verification failure is a 500.
pub async fn google_callback(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<OAuthCallbackQuery>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let provider = state
        .oauth
        .clone()
        .ok_or_else(|| ApiError::InternalServer("Google login is not configured".to_string()))?;

    let jar = cookie_jar(&state, &headers);
    let cookie_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(removal_cookie(OAUTH_STATE_COOKIE));

    let query_state = match (params.state.as_deref(), cookie_state.as_deref()) {
        (Some(query), Some(cookie)) if query == cookie => query,
        _ => {
            error!("OAuth callback state does not match the state cookie");
            return Err(ApiError::InternalServer("OAuth state mismatch".to_string()));
        }
    };

    if !SessionStore::from_state(&state)
        .consume_oauth_state(query_state)
        .await?
    {
        error!("OAuth callback state is unknown or expired");
        return Err(ApiError::InternalServer("OAuth state mismatch".to_string()));
    }

    if let Some(oauth_error) = params.error {
        warn!(oauth_error = %oauth_error, "Google returned an authorization error");
        return Err(ApiError::BadRequest(format!(
            "Google login failed: {}",
            oauth_error
        )));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No authorization code provided".to_string()))?;

    let identity = provider.authenticate(&code).await.map_err(|e| {
        error!(error = %e, "Google identity verification failed");
        ApiError::InternalServer(format!("Google login failed: {}", e))
    })?;

    let user = UsersService::new(state.db.clone())
        .find_or_create_google_user(&identity)
        .await?;
    let jar = open_session(&state, jar, &user).await?;

    Ok((jar, Redirect::to("/dashboard")))
}

/// GET /dashboard
pub async fn dashboard(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let user = UsersService::new(state.db.clone())
        .get_by_id(&authed.user_id)
        .await
        .map_err(|e| match e {
            // Session outlived its user row
            ApiError::NotFound(_) => ApiError::Unauthorized("Login required".to_string()),
            other => other,
        })?;

    let games = GamesService::new(state.db.clone());
    let created_games = games.list_created_by(&user.id).await?;
    let joined_games = games.list_joined_by(&user.id).await?;

    Ok(Json(DashboardResponse {
        google_linked: user.google_id.is_some(),
        user,
        created_games,
        joined_games,
    }))
}
