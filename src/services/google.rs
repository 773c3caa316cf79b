// src/services/google.rs
use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::common::config::GoogleOAuthConfig;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const CERTS_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/certs";
const ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
const SCOPES: &str = "openid email profile";

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    #[error("Identity token missing claim: {0}")]
    MissingClaim(&'static str),
}

/// Verified identity extracted from a Google ID token
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleIdentity {
    pub google_id: String,
    pub email: String,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// Token endpoint response; only the ID token is used, access tokens are discarded
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub id_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// Claims we read from a Google ID token; `aud`, `iss` and `exp` are checked by `Validation`
#[derive(Debug, Deserialize)]
pub struct GoogleIdTokenClaims {
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// Authorization-code login provider.
///
/// Handlers only see this trait, so the callback flow can run against a stub.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the browser is redirected to, carrying `state`
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code and return the verified identity
    async fn authenticate(&self, code: &str) -> Result<GoogleIdentity, GoogleError>;
}

#[derive(Debug, Clone)]
pub struct GoogleService {
    config: GoogleOAuthConfig,
    client: Client,
}

impl GoogleService {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Exchange authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(GoogleError::OAuthFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, GoogleError> {
        let response = self
            .client
            .get(CERTS_ENDPOINT)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoogleError::RequestFailed(format!(
                "certs endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))
    }

    /// Verify signature, audience, issuer and expiry of a Google ID token
    pub async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdTokenClaims, GoogleError> {
        let header =
            decode_header(id_token).map_err(|e| GoogleError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| GoogleError::InvalidToken("missing key id".to_string()))?;

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks
            .find(&kid)
            .ok_or_else(|| GoogleError::InvalidToken(format!("unknown key id {}", kid)))?;

        let key = match &jwk.algorithm {
            AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|e| GoogleError::InvalidToken(e.to_string()))?,
            _ => {
                return Err(GoogleError::InvalidToken(
                    "unsupported key algorithm".to_string(),
                ))
            }
        };

        let data = decode::<GoogleIdTokenClaims>(
            id_token,
            &key,
            &id_token_validation(&self.config.client_id),
        )
        .map_err(|e| GoogleError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }
}

#[async_trait]
impl OAuthProvider for GoogleService {
    fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=online&prompt=select_account",
            AUTHORIZATION_ENDPOINT,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state)
        )
    }

    async fn authenticate(&self, code: &str) -> Result<GoogleIdentity, GoogleError> {
        let tokens = self.exchange_code(code).await?;
        debug!(expires_in = ?tokens.expires_in, "Received Google token response");
        let id_token = tokens
            .id_token
            .ok_or_else(|| GoogleError::OAuthFailed("token response has no id_token".to_string()))?;

        let claims = self.verify_id_token(&id_token).await?;
        let identity = identity_from_claims(claims)?;

        info!(google_id = %identity.google_id, "Google identity token verified");
        Ok(identity)
    }
}

fn id_token_validation(client_id: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[client_id]);
    validation.set_issuer(&ISSUERS);
    validation
}

/// Turns verified claims into an identity; an email is mandatory
pub fn identity_from_claims(claims: GoogleIdTokenClaims) -> Result<GoogleIdentity, GoogleError> {
    let email = claims
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or(GoogleError::MissingClaim("email"))?;

    if claims.email_verified == Some(false) {
        return Err(GoogleError::InvalidToken("email not verified".to_string()));
    }

    Ok(GoogleIdentity {
        google_id: claims.sub,
        email,
        name: claims.name,
        given_name: claims.given_name,
        family_name: claims.family_name,
        picture: claims.picture,
    })
}
