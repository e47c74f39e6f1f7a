//! Session and refresh token persistence.

use async_trait::async_trait;
use sqlx::PgPool;

use elib_auth::session::SessionStore;
use elib_core::error::{AppError, ErrorKind};
use elib_core::result::AppResult;
use elib_entity::session::{NewRefreshToken, RefreshToken};

/// Columns returned for every refresh token row.
const TOKEN_COLUMNS: &str = "token_id, refresh_token, expires_at, session_id";

/// Repository for sessions and their refresh tokens.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a session and its first refresh token in one transaction.
    pub async fn create(&self, user_id: i64, token: &NewRefreshToken) -> AppResult<RefreshToken> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to begin transaction", e)
        })?;

        let session_id: i64 = sqlx::query_scalar(
            "INSERT INTO sessions (user_id) VALUES ($1) RETURNING session_id",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to create session", e))?;

        let row = sqlx::query_as::<_, RefreshToken>(&format!(
            "INSERT INTO tokens (refresh_token, expires_at, session_id) \
             VALUES ($1, $2, $3) RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(&token.refresh_token)
        .bind(token.expires_at)
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to store refresh token", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to commit session", e)
        })?;

        Ok(row)
    }

    /// Delete a refresh token row and return it, in a single statement.
    pub async fn pop(&self, refresh_token: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(&format!(
            "DELETE FROM tokens WHERE refresh_token = $1 RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to pop refresh token", e))
    }

    /// Insert a refresh token for a session that has not been logged out.
    ///
    /// Returns `None` when the session is unknown or already ended.
    pub async fn insert_for_active_session(
        &self,
        session_id: i64,
        token: &NewRefreshToken,
    ) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(&format!(
            "INSERT INTO tokens (refresh_token, expires_at, session_id) \
             SELECT $1, $2, session_id FROM sessions \
             WHERE session_id = $3 AND logged_out_at IS NULL \
             RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(&token.refresh_token)
        .bind(token.expires_at)
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to store refresh token", e)
        })
    }

    /// Find the user that owns a session.
    pub async fn find_user_id(&self, session_id: i64) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT user_id FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to find session owner", e)
            })
    }

    /// Stamp `logged_out_at`, keeping an earlier stamp. Returns `false` if
    /// the session does not exist.
    pub async fn mark_logged_out(&self, session_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET logged_out_at = COALESCE(logged_out_at, NOW()) \
             WHERE session_id = $1",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to end session", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create_session(
        &self,
        user_id: i64,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken, AppError> {
        self.create(user_id, token).await
    }

    async fn pop_refresh_token(&self, refresh_token: &str) -> Result<RefreshToken, AppError> {
        self.pop(refresh_token)
            .await?
            .ok_or_else(|| AppError::not_found("refresh token not found"))
    }

    async fn rotate_refresh_token(
        &self,
        session_id: i64,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken, AppError> {
        self.insert_for_active_session(session_id, token)
            .await?
            .ok_or_else(|| AppError::not_found(format!("active session {session_id} not found")))
    }

    async fn get_user_id_for_session(&self, session_id: i64) -> Result<i64, AppError> {
        self.find_user_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("session {session_id} not found")))
    }

    async fn end_session(&self, session_id: i64) -> Result<(), AppError> {
        if self.mark_logged_out(session_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("session {session_id} not found")))
        }
    }
}
