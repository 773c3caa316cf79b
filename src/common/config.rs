// src/common/config.rs
//! Environment-driven application configuration

use std::env;
use thiserror::Error;

/// Minimum length of SECRET_KEY; the signed-cookie key is derived from it.
pub const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SECRET_KEY is not set")]
    MissingSecretKey,

    #[error("SECRET_KEY must be at least 32 bytes long")]
    SecretKeyTooShort,

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("GOOGLE_REDIRECT_URI uses http:// but OAUTHLIB_INSECURE_TRANSPORT is not enabled")]
    InsecureRedirectUri,
}

/// Google OAuth client credentials
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub secret_key: String,
    pub google: Option<GoogleOAuthConfig>,
    /// Development flag: allows plain-http OAuth redirects and non-Secure cookies
    pub insecure_transport: bool,
    pub session_ttl_hours: i64,
    pub reset_db: bool,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://footmatch.db".to_string());

        let secret_key = lookup("SECRET_KEY").ok_or(ConfigError::MissingSecretKey)?;
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(ConfigError::SecretKeyTooShort);
        }

        let insecure_transport = parse_flag(lookup("OAUTHLIB_INSECURE_TRANSPORT"));
        let reset_db = parse_flag(lookup("RESET_DB"));

        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "SESSION_TTL_HOURS",
                        value: raw,
                    })
                }
            },
            None => 24 * 7,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw,
            })?,
            None => 5000,
        };

        let google = match (lookup("GOOGLE_CLIENT_ID"), lookup("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                let redirect_uri = lookup("GOOGLE_REDIRECT_URI")
                    .unwrap_or_else(|| "http://localhost:5000/callback".to_string());
                if redirect_uri.starts_with("http://") && !insecure_transport {
                    return Err(ConfigError::InsecureRedirectUri);
                }
                Some(GoogleOAuthConfig {
                    client_id,
                    client_secret,
                    redirect_uri,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            secret_key,
            google,
            insecure_transport,
            session_ttl_hours,
            reset_db,
            port,
        })
    }

    /// Whether cookies should carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        !self.insecure_transport
    }
}

fn parse_flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(|v| v.trim().to_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

/// Print configuration summary on startup
pub fn log_config_summary(config: &AppConfig) {
    tracing::info!(
        database_url = %config.database_url,
        google_oauth = config.google.is_some(),
        insecure_transport = config.insecure_transport,
        session_ttl_hours = config.session_ttl_hours,
        port = config.port,
        "Configuration loaded"
    );
    if config.insecure_transport {
        tracing::warn!("OAUTHLIB_INSECURE_TRANSPORT enabled - do not use in production");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("SECRET_KEY", SECRET)])).unwrap();

        assert_eq!(config.database_url, "sqlite://footmatch.db");
        assert_eq!(config.port, 5000);
        assert_eq!(config.session_ttl_hours, 168);
        assert!(config.google.is_none());
        assert!(!config.insecure_transport);
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_missing_and_short_secret() {
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[])),
            Err(ConfigError::MissingSecretKey)
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("SECRET_KEY", "short")])),
            Err(ConfigError::SecretKeyTooShort)
        ));
    }

    #[test]
    fn test_http_redirect_requires_insecure_flag() {
        let base = [
            ("SECRET_KEY", SECRET),
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("GOOGLE_REDIRECT_URI", "http://localhost:5000/callback"),
        ];
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&base)),
            Err(ConfigError::InsecureRedirectUri)
        ));

        let mut with_flag = base.to_vec();
        with_flag.push(("OAUTHLIB_INSECURE_TRANSPORT", "1"));
        let config = AppConfig::from_lookup(lookup_from(&with_flag)).unwrap();
        assert!(!config.secure_cookies());
        let google = config.google.as_ref().expect("google config");
        assert_eq!(google.client_id, "client");
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("SECRET_KEY", SECRET), ("PORT", "abc")])),
            Err(ConfigError::InvalidValue { key: "PORT", .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[
                ("SECRET_KEY", SECRET),
                ("SESSION_TTL_HOURS", "0")
            ])),
            Err(ConfigError::InvalidValue {
                key: "SESSION_TTL_HOURS",
                ..
            })
        ));
    }
}
