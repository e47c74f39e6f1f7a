//! Authentication configuration.

use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Storage format used when hashing new passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Unsalted SHA-256, lowercase hex. Compatible with existing credentials.
    #[default]
    Sha256,
    /// Argon2id PHC string with a random salt.
    Argon2id,
}

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric key for access-token signing (HMAC-SHA256).
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: i64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: i64,
    /// Scheme used to hash new passwords.
    #[serde(default)]
    pub password_scheme: PasswordScheme,
}

impl AuthConfig {
    /// Builds a configuration with the given key and default lifetimes.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            password_scheme: PasswordScheme::default(),
        }
    }

    /// Rejects settings the session service cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        check_ttl(
            "auth.access_token_ttl_minutes",
            self.access_token_ttl_minutes,
            TimeDelta::try_minutes(self.access_token_ttl_minutes),
        )?;
        check_ttl(
            "auth.refresh_token_ttl_days",
            self.refresh_token_ttl_days,
            TimeDelta::try_days(self.refresh_token_ttl_days),
        )
    }
}

/// A lifetime must be positive and expiries computed from it must stay
/// representable as timestamps.
fn check_ttl(key: &str, value: i64, ttl: Option<TimeDelta>) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::configuration(format!("{key} must be positive")));
    }
    ttl.and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .map(|_| ())
        .ok_or_else(|| AppError::configuration(format!("{key} is out of range: {value}")))
}

fn default_access_ttl() -> i64 {
    15
}

fn default_refresh_ttl() -> i64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults_match_token_lifetimes() {
        let config = AuthConfig::with_secret("key");
        assert_eq!(config.access_token_ttl_minutes, 15);
        assert_eq!(config.refresh_token_ttl_days, 30);
        assert_eq!(config.password_scheme, PasswordScheme::Sha256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_secret_is_rejected() {
        let err = AuthConfig::with_secret("  ").validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn non_positive_ttls_are_rejected() {
        let mut config = AuthConfig::with_secret("key");
        config.access_token_ttl_minutes = 0;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);

        let mut config = AuthConfig::with_secret("key");
        config.refresh_token_ttl_days = -1;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);
    }

    #[test]
    fn oversized_ttls_are_rejected() {
        // Overflows the duration itself.
        let mut config = AuthConfig::with_secret("key");
        config.refresh_token_ttl_days = i64::MAX / 1000;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);

        // Fits a duration, but now + ttl is past the last representable date.
        let mut config = AuthConfig::with_secret("key");
        config.refresh_token_ttl_days = 100_000_000;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);

        let mut config = AuthConfig::with_secret("key");
        config.access_token_ttl_minutes = i64::MAX;
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Configuration);
    }

    #[test]
    fn scheme_deserializes_lowercase() {
        let scheme: PasswordScheme = serde_json::from_str("\"argon2id\"").unwrap();
        assert_eq!(scheme, PasswordScheme::Argon2id);
    }
}
