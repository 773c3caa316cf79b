//! Server-side session and OAuth-state storage

use chrono::{Duration, SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::models::{Session, User};
use crate::common::{generate_token, ApiError, AppState};

/// OAuth state values live for 10 minutes
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

#[derive(Clone)]
pub struct SessionStore {
    db: SqlitePool,
    ttl: Duration,
}

/// Timestamps are stored as fixed-width UTC RFC 3339 so string comparison orders them
fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl SessionStore {
    pub fn new(db: SqlitePool, ttl_hours: i64) -> Self {
        Self {
            db,
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.db.clone(), state.config.session_ttl_hours)
    }

    pub async fn create_session(&self, user: &User) -> Result<Session, ApiError> {
        let now = Utc::now();
        let session = Session {
            id: generate_token(),
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: Some(user.name.clone()),
            picture: user.picture.clone(),
            google_id: user.google_id.clone(),
            created_at: timestamp(now),
            expires_at: timestamp(now + self.ttl),
        };

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, email, name, picture, google_id, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.email)
        .bind(&session.name)
        .bind(&session.picture)
        .bind(&session.google_id)
        .bind(&session.created_at)
        .bind(&session.expires_at)
        .execute(&self.db)
        .await?;

        debug!(user_id = %session.user_id, "Session created");
        Ok(session)
    }

    /// Returns the session when it exists and has not expired
    pub async fn get_session(&self, id: &str) -> Result<Option<Session>, ApiError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, email, name, picture, google_id, created_at, expires_at
            FROM sessions
            WHERE id = ? AND expires_at > ?
            "#,
        )
        .bind(id)
        .bind(timestamp(Utc::now()))
        .fetch_optional(&self.db)
        .await?;

        Ok(session)
    }

    pub async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Drop expired sessions and OAuth states; returns the number of sessions removed
    pub async fn purge_expired(&self) -> Result<u64, ApiError> {
        let now = timestamp(Utc::now());

        let removed = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(&now)
            .execute(&self.db)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM oauth_states WHERE expires_at <= ?")
            .bind(&now)
            .execute(&self.db)
            .await?;

        Ok(removed)
    }

    pub async fn store_oauth_state(&self, state: &str) -> Result<(), ApiError> {
        let now = Utc::now();
        sqlx::query("INSERT INTO oauth_states (state, created_at, expires_at) VALUES (?, ?, ?)")
            .bind(state)
            .bind(timestamp(now))
            .bind(timestamp(now + Duration::minutes(OAUTH_STATE_TTL_MINUTES)))
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// One-time use: true only for a stored, unexpired state, which is deleted
    pub async fn consume_oauth_state(&self, state: &str) -> Result<bool, ApiError> {
        let consumed = sqlx::query("DELETE FROM oauth_states WHERE state = ? AND expires_at > ?")
            .bind(state)
            .bind(timestamp(Utc::now()))
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(consumed == 1)
    }
}
