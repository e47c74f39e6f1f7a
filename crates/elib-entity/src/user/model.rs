//! User and credential row models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered library user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    #[sqlx(rename = "user_id")]
    #[serde(rename = "userID")]
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic, if the user has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    /// Reference into the `roles` table.
    #[serde(rename = "roleID")]
    pub role_id: i32,
    /// Student group, present for students only.
    #[serde(rename = "groupID", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

/// Login credentials stored for a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserCredentials {
    /// Owning user.
    pub user_id: i64,
    /// Unique login name.
    pub login: String,
    /// Stored password digest.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Username and plaintext password presented at login.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl Credentials {
    /// Creates a credentials pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
