//! Claims carried by every access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use elib_entity::user::UserRole;

/// JWT claims payload.
///
/// Never persisted. The `Role` key keeps the capitalised name existing
/// clients decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID as a decimal string.
    pub sub: String,
    /// Role ordinal (student 0, teacher 1, manager 2, admin 3).
    #[serde(rename = "Role")]
    pub role: u8,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Unique token ID, so two tokens minted in the same second differ.
    pub jti: String,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Returns the role encoded in the token, if the ordinal is known.
    pub fn user_role(&self) -> Option<UserRole> {
        UserRole::from_ordinal(self.role)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
