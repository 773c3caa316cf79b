use rand::Rng;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{LoginForm, SignUpForm, User};
use super::validators::{LoginValidator, SignUpValidator};
use crate::common::error::is_unique_violation;
use crate::common::helpers::normalize_email;
use crate::common::{generate_raw_id, generate_user_id, safe_email_log, ApiError, Validator};
use crate::services::GoogleIdentity;

pub const ALREADY_REGISTERED_MESSAGE: &str = "This email is already registered";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

const USER_COLUMNS: &str =
    "id, name, surname, email, password_hash, google_id, picture, created_at";

/// Salted argon2 hash, computed on the blocking pool
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || {
        let salt: [u8; 32] = rand::thread_rng().gen();
        argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
    })
    .await
    .map_err(|e| ApiError::InternalServer(format!("password hashing task failed: {}", e)))?
    .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))
}

pub async fn verify_password(hash: String, password: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || argon2::verify_encoded(&hash, password.as_bytes()))
        .await
        .map_err(|e| ApiError::InternalServer(format!("password check task failed: {}", e)))?
        .map_err(|e| ApiError::InternalServer(format!("password check failed: {}", e)))
}

pub struct UsersService {
    db: SqlitePool,
}

impl UsersService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, user_id: &str) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
                .bind(normalize_email(email))
                .fetch_optional(&self.db)
                .await?;
        Ok(user)
    }

    /// Create a local account after validating the sign-up form
    pub async fn register(&self, form: SignUpForm) -> Result<User, ApiError> {
        SignUpValidator.validate(&form).into_result()?;

        let email = normalize_email(&form.email);
        if self.find_by_email(&email).await?.is_some() {
            info!(email = %safe_email_log(&email), "Registration rejected: email already registered");
            return Err(ApiError::Conflict(ALREADY_REGISTERED_MESSAGE.to_string()));
        }

        let password_hash = hash_password(form.password).await?;
        let id = generate_user_id();

        self.insert_user(
            &id,
            form.name.trim(),
            form.surname.trim(),
            &email,
            &password_hash,
            None,
            None,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(ALREADY_REGISTERED_MESSAGE.to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        info!(user_id = %id, email = %safe_email_log(&email), "User registered");
        self.get_by_id(&id).await
    }

    /// Check credentials; the error never says which field was wrong
    pub async fn authenticate(&self, form: &LoginForm) -> Result<User, ApiError> {
        LoginValidator.validate(form).into_result()?;

        let user = match self.find_by_email(&form.email).await? {
            Some(user) => user,
            None => {
                warn!(email = %safe_email_log(&form.email), "Login failed: unknown email");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string()));
            }
        };

        if !verify_password(user.password_hash.clone(), form.password.clone()).await? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string()));
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Find the local account for a Google identity, creating it on first login
    pub async fn find_or_create_google_user(
        &self,
        identity: &GoogleIdentity,
    ) -> Result<User, ApiError> {
        let email = normalize_email(&identity.email);

        if let Some(existing) = self.find_by_email(&email).await? {
            sqlx::query(
                r#"
                UPDATE users
                SET google_id = COALESCE(google_id, ?), picture = COALESCE(?, picture)
                WHERE id = ?
                "#,
            )
            .bind(&identity.google_id)
            .bind(&identity.picture)
            .bind(&existing.id)
            .execute(&self.db)
            .await?;

            info!(user_id = %existing.id, "Google login for existing user");
            return self.get_by_id(&existing.id).await;
        }

        let name = identity
            .given_name
            .clone()
            .or_else(|| identity.name.clone())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
        let surname = identity.family_name.clone().unwrap_or_default();

        // OAuth-only accounts get an unguessable password nobody knows
        let password_hash = hash_password(generate_raw_id(32)).await?;
        let id = generate_user_id();

        let inserted = self
            .insert_user(
                &id,
                &name,
                &surname,
                &email,
                &password_hash,
                Some(&identity.google_id),
                identity.picture.as_deref(),
            )
            .await;

        match inserted {
            Ok(()) => {
                info!(user_id = %id, email = %safe_email_log(&email), "User created via Google login");
                self.get_by_id(&id).await
            }
            // Concurrent first login for the same email
            Err(e) if is_unique_violation(&e) => self
                .find_by_email(&email)
                .await?
                .ok_or_else(|| ApiError::InternalServer("user vanished after conflict".to_string())),
            Err(e) => Err(ApiError::DatabaseError(e)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_user(
        &self,
        id: &str,
        name: &str,
        surname: &str,
        email: &str,
        password_hash: &str,
        google_id: Option<&str>,
        picture: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, surname, email, password_hash, google_id, picture)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(surname)
        .bind(email)
        .bind(password_hash)
        .bind(google_id)
        .bind(picture)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
