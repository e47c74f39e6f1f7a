//! Access token signing.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use elib_core::error::{AppError, ErrorKind};
use elib_entity::user::UserRole;

use super::claims::Claims;

/// A signed access token and its expiry.
#[derive(Debug, Clone)]
pub struct SignedAccessToken {
    /// The compact JWT string.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Signs HS256 access tokens with the process-wide symmetric key.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token lifetime.
    access_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from the signing key and token lifetime.
    pub fn new(signing_key: &[u8], access_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            access_ttl,
        }
    }

    /// Signs an access token for `user_id` carrying the ordinal of `role_name`.
    ///
    /// Role names outside the closed catalogue are signed as student.
    pub fn sign(&self, user_id: i64, role_name: &str) -> Result<SignedAccessToken, AppError> {
        self.sign_role(user_id, UserRole::resolve(role_name))
    }

    /// Signs an access token for an already resolved role.
    pub fn sign_role(&self, user_id: i64, role: UserRole) -> Result<SignedAccessToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.ordinal(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Internal,
                    format!("Failed to encode access token: {e}"),
                    e,
                )
            })?;

        Ok(SignedAccessToken { token, expires_at })
    }
}
