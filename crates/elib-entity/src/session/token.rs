//! Refresh token rows and the token pair handed back to callers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored refresh token.
///
/// The token string is an opaque capability. It is consumed by a single
/// delete-returning "pop" and can never authenticate twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Row identifier.
    pub token_id: i64,
    /// The opaque token value (64 lowercase hex characters).
    pub refresh_token: String,
    /// Absolute expiry, unix seconds.
    pub expires_at: i64,
    /// The session this token belongs to.
    pub session_id: i64,
}

impl RefreshToken {
    /// Whether the token had expired at the given unix time.
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        self.expires_at < now_unix
    }
}

/// A freshly generated refresh token, not yet bound to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshToken {
    /// The opaque token value.
    pub refresh_token: String,
    /// Absolute expiry, unix seconds.
    pub expires_at: i64,
}

/// Access token plus refresh token returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Signed short-lived access token.
    pub access_token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
    /// Refresh token expiry, unix seconds. Kept server-side, never serialized.
    #[serde(skip)]
    pub refresh_expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_strictly_before_now() {
        let token = RefreshToken {
            token_id: 1,
            refresh_token: "ab".repeat(32),
            expires_at: 1_000,
            session_id: 7,
        };
        assert!(!token.is_expired_at(999));
        assert!(!token.is_expired_at(1_000));
        assert!(token.is_expired_at(1_001));
    }

    #[test]
    fn token_pair_uses_camel_case_and_hides_expiry() {
        let pair = TokenPair {
            access_token: "a.b.c".into(),
            refresh_token: "ff".repeat(32),
            refresh_expires_at: 42,
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["accessToken"], "a.b.c");
        assert_eq!(json["refreshToken"], "ff".repeat(32));
        assert!(json.get("refreshExpiresAt").is_none());
    }
}
