//! User, credential, and role lookups.

use async_trait::async_trait;
use sqlx::PgPool;

use elib_auth::session::UserDirectory;
use elib_core::error::{AppError, ErrorKind};
use elib_core::result::AppResult;
use elib_entity::user::UserCredentials;

/// Repository for user, credential, and role queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find stored credentials by exact login.
    pub async fn find_credentials_by_login(&self, login: &str) -> AppResult<Option<UserCredentials>> {
        sqlx::query_as::<_, UserCredentials>(
            "SELECT user_id, login, password_hash FROM users_credentials WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to find user credentials", e)
        })
    }

    /// Find the role name assigned to a user.
    pub async fn find_role_name(&self, user_id: i64) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM users u JOIN roles r ON r.role_id = u.role_id \
             WHERE u.user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to find user role", e))
    }

    /// List every role name in the `roles` table.
    pub async fn role_names(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM roles ORDER BY role_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to list roles", e))
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn get_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<UserCredentials, AppError> {
        self.find_credentials_by_login(username)
            .await?
            .ok_or_else(|| AppError::invalid_login("invalid login"))
    }

    async fn get_role(&self, user_id: i64) -> Result<String, AppError> {
        self.find_role_name(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("role of user {user_id} not found")))
    }
}
