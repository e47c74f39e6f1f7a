//! Session and refresh token persistence contract.

use async_trait::async_trait;

use elib_core::error::AppError;
use elib_entity::session::{NewRefreshToken, RefreshToken};

/// Persists sessions and the refresh tokens bound to them.
///
/// Every method is a single atomic unit against the backing store.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Opens a session for `user_id` and stores its first refresh token.
    ///
    /// Either both rows are written or neither is.
    async fn create_session(
        &self,
        user_id: i64,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken, AppError>;

    /// Atomically deletes the token row and returns what it held.
    ///
    /// Of any number of concurrent pops of the same value at most one
    /// succeeds; the rest fail with `NotFound`.
    async fn pop_refresh_token(&self, refresh_token: &str) -> Result<RefreshToken, AppError>;

    /// Stores a new refresh token for an existing, still active session.
    ///
    /// Fails with `NotFound` if the session is unknown or already ended.
    async fn rotate_refresh_token(
        &self,
        session_id: i64,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken, AppError>;

    /// Returns the owner of `session_id`.
    async fn get_user_id_for_session(&self, session_id: i64) -> Result<i64, AppError>;

    /// Marks the session as logged out. Ending an ended session is a no-op.
    async fn end_session(&self, session_id: i64) -> Result<(), AppError>;
}
