//! Read access to user credentials and roles.

use async_trait::async_trait;

use elib_core::error::AppError;
use elib_entity::user::UserCredentials;

/// Looks up the data login and refresh need about a user.
///
/// Implementations must be thread-safe; the session service shares one
/// instance across concurrent requests.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug {
    /// Returns the stored credentials for `username`.
    ///
    /// Fails with `InvalidLogin` when no such user exists.
    async fn get_credentials_by_username(&self, username: &str)
    -> Result<UserCredentials, AppError>;

    /// Returns the role name of `user_id`.
    ///
    /// Fails with `NotFound` when the user or its role row is missing.
    async fn get_role(&self, user_id: i64) -> Result<String, AppError>;
}
