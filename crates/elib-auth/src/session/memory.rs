//! In-memory user directory and session store using Tokio mutexes.
//!
//! Suitable for tests and single-process tooling only; nothing survives a
//! restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use elib_core::error::AppError;
use elib_entity::session::{NewRefreshToken, RefreshToken, Session};
use elib_entity::user::UserCredentials;

use super::directory::UserDirectory;
use super::store::SessionStore;

/// Internal state for the memory-based user directory.
#[derive(Debug, Default)]
struct DirectoryState {
    /// Credentials keyed by login.
    credentials: HashMap<String, UserCredentials>,
    /// Role name keyed by user ID.
    roles: HashMap<i64, String>,
    /// Last issued user ID.
    last_id: i64,
}

/// In-memory [`UserDirectory`].
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    /// Protected inner state.
    state: Arc<Mutex<DirectoryState>>,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns its ID.
    pub async fn add_user(&self, login: &str, password_hash: &str, role_name: &str) -> i64 {
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let user_id = state.last_id;

        state.credentials.insert(
            login.to_string(),
            UserCredentials {
                user_id,
                login: login.to_string(),
                password_hash: password_hash.to_string(),
            },
        );
        state.roles.insert(user_id, role_name.to_string());
        user_id
    }

    /// Replaces the role of an existing user.
    pub async fn set_role(&self, user_id: i64, role_name: &str) {
        self.state
            .lock()
            .await
            .roles
            .insert(user_id, role_name.to_string());
    }

    /// Drops the role row of a user, leaving its credentials in place.
    pub async fn remove_role(&self, user_id: i64) {
        self.state.lock().await.roles.remove(&user_id);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn get_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<UserCredentials, AppError> {
        self.state
            .lock()
            .await
            .credentials
            .get(username)
            .cloned()
            .ok_or_else(|| AppError::invalid_login("invalid login"))
    }

    async fn get_role(&self, user_id: i64) -> Result<String, AppError> {
        self.state
            .lock()
            .await
            .roles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("role of user {user_id} not found")))
    }
}

/// Internal state for the memory-based session store.
#[derive(Debug, Default)]
struct StoreState {
    /// Sessions keyed by ID.
    sessions: HashMap<i64, Session>,
    /// Live refresh tokens keyed by token value.
    tokens: HashMap<String, RefreshToken>,
    /// Last issued session ID.
    last_session_id: i64,
    /// Last issued token row ID.
    last_token_id: i64,
}

impl StoreState {
    fn insert_token(&mut self, session_id: i64, token: &NewRefreshToken) -> RefreshToken {
        self.last_token_id += 1;
        let row = RefreshToken {
            token_id: self.last_token_id,
            refresh_token: token.refresh_token.clone(),
            expires_at: token.expires_at,
            session_id,
        };
        self.tokens.insert(row.refresh_token.clone(), row.clone());
        row
    }
}

/// In-memory [`SessionStore`].
///
/// Each operation holds the mutex for its whole duration, which gives the
/// same all-or-nothing behaviour a database transaction does.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    /// Protected inner state.
    state: Arc<Mutex<StoreState>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of a session.
    pub async fn session(&self, session_id: i64) -> Option<Session> {
        self.state.lock().await.sessions.get(&session_id).cloned()
    }

    /// Number of sessions ever opened.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    /// Number of unconsumed refresh tokens bound to `session_id`.
    pub async fn live_token_count(&self, session_id: i64) -> usize {
        self.state
            .lock()
            .await
            .tokens
            .values()
            .filter(|t| t.session_id == session_id)
            .count()
    }

    /// Returns the stored row for a token value, without consuming it.
    pub async fn find_token(&self, refresh_token: &str) -> Option<RefreshToken> {
        self.state.lock().await.tokens.get(refresh_token).cloned()
    }

    /// Overwrites the expiry of a stored token.
    pub async fn set_token_expiry(&self, refresh_token: &str, expires_at: i64) -> bool {
        match self.state.lock().await.tokens.get_mut(refresh_token) {
            Some(row) => {
                row.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(
        &self,
        user_id: i64,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken, AppError> {
        let mut state = self.state.lock().await;
        if state.tokens.contains_key(&token.refresh_token) {
            return Err(AppError::internal("duplicate refresh token"));
        }

        state.last_session_id += 1;
        let session_id = state.last_session_id;
        state.sessions.insert(
            session_id,
            Session {
                id: session_id,
                user_id,
                created_at: Utc::now(),
                logged_out_at: None,
            },
        );

        Ok(state.insert_token(session_id, token))
    }

    async fn pop_refresh_token(&self, refresh_token: &str) -> Result<RefreshToken, AppError> {
        self.state
            .lock()
            .await
            .tokens
            .remove(refresh_token)
            .ok_or_else(|| AppError::not_found("refresh token not found"))
    }

    async fn rotate_refresh_token(
        &self,
        session_id: i64,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken, AppError> {
        let mut state = self.state.lock().await;
        let active = state
            .sessions
            .get(&session_id)
            .is_some_and(Session::is_active);
        if !active {
            return Err(AppError::not_found(format!(
                "active session {session_id} not found"
            )));
        }
        if state.tokens.contains_key(&token.refresh_token) {
            return Err(AppError::internal("duplicate refresh token"));
        }

        Ok(state.insert_token(session_id, token))
    }

    async fn get_user_id_for_session(&self, session_id: i64) -> Result<i64, AppError> {
        self.state
            .lock()
            .await
            .sessions
            .get(&session_id)
            .map(|s| s.user_id)
            .ok_or_else(|| AppError::not_found(format!("session {session_id} not found")))
    }

    async fn end_session(&self, session_id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::not_found(format!("session {session_id} not found")))?;

        if session.logged_out_at.is_none() {
            session.logged_out_at = Some(Utc::now());
        }
        Ok(())
    }
}
