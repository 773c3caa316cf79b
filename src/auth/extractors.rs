//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use std::sync::Arc;
use tracing::{debug, warn};

use super::session::SessionStore;
use crate::common::{ApiError, AppState};

pub const SESSION_COOKIE: &str = "footmatch_session";
pub const OAUTH_STATE_COOKIE: &str = "footmatch_oauth_state";

/// Same lifetime as the stored OAuth state
const OAUTH_STATE_COOKIE_MINUTES: i64 = 10;

/// Signed session cookie carrying the server-side session id
pub fn session_cookie(session_id: String, secure: bool, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie::time::Duration::hours(ttl_hours))
        .build()
}

pub fn oauth_state_cookie(state: String, secure: bool) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, state))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie::time::Duration::minutes(OAUTH_STATE_COOKIE_MINUTES))
        .build()
}

/// Cookie value used to clear `name`; path must match the one it was set with
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Authenticated user extractor
///
/// Reads the signed session cookie and loads the matching unexpired session.
/// Rejects with 401 when there is no cookie, the signature is bad, or the
/// session is gone.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub session_id: String,
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let jar = SignedCookieJar::from_headers(&parts.headers, app_state.cookie_key.clone());

        let session_id = match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => {
                debug!(path = %parts.uri.path(), "Authentication failed: no session cookie");
                return Err(ApiError::Unauthorized("Login required".into()));
            }
        };

        let store = SessionStore::from_state(&app_state);
        match store.get_session(&session_id).await? {
            Some(session) => Ok(AuthedUser {
                session_id: session.id,
                user_id: session.user_id,
                email: session.email,
                name: session.name,
            }),
            None => {
                warn!(path = %parts.uri.path(), "Authentication failed: session expired or unknown");
                Err(ApiError::Unauthorized("Session expired, please log in again".into()))
            }
        }
    }
}
