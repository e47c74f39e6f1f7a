//! Shared fixtures for session lifecycle tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use elib_auth::password::sha256_hex;
use elib_auth::{Claims, JwtDecoder, MemorySessionStore, MemoryUserDirectory, SessionService, SessionStore};
use elib_core::config::AuthConfig;
use elib_core::error::AppError;
use elib_entity::session::{NewRefreshToken, RefreshToken, TokenPair};
use elib_entity::user::Credentials;

pub const SIGNING_KEY: &str = "integration-test-signing-key";

/// Session store that delegates to memory and fails on demand.
#[derive(Debug, Default)]
pub struct FaultySessionStore {
    pub inner: MemorySessionStore,
    pub fail_create: AtomicBool,
    pub fail_rotate: AtomicBool,
    pub fail_end: AtomicBool,
    pub fail_pop: AtomicBool,
    pub rotate_delay: std::sync::Mutex<Option<Duration>>,
}

impl FaultySessionStore {
    fn injected(op: &str) -> AppError {
        AppError::internal(format!("injected {op} failure"))
    }
}

#[async_trait]
impl SessionStore for FaultySessionStore {
    async fn create_session(
        &self,
        user_id: i64,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken, AppError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::injected("create"));
        }
        self.inner.create_session(user_id, token).await
    }

    async fn pop_refresh_token(&self, refresh_token: &str) -> Result<RefreshToken, AppError> {
        if self.fail_pop.load(Ordering::SeqCst) {
            return Err(Self::injected("pop"));
        }
        self.inner.pop_refresh_token(refresh_token).await
    }

    async fn rotate_refresh_token(
        &self,
        session_id: i64,
        token: &NewRefreshToken,
    ) -> Result<RefreshToken, AppError> {
        let delay = *self.rotate_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_rotate.load(Ordering::SeqCst) {
            return Err(Self::injected("rotate"));
        }
        self.inner.rotate_refresh_token(session_id, token).await
    }

    async fn get_user_id_for_session(&self, session_id: i64) -> Result<i64, AppError> {
        self.inner.get_user_id_for_session(session_id).await
    }

    async fn end_session(&self, session_id: i64) -> Result<(), AppError> {
        if self.fail_end.load(Ordering::SeqCst) {
            return Err(Self::injected("end"));
        }
        self.inner.end_session(session_id).await
    }
}

/// A session service wired to in-memory collaborators.
pub struct TestApp {
    pub service: SessionService,
    pub users: MemoryUserDirectory,
    pub store: Arc<FaultySessionStore>,
    pub decoder: JwtDecoder,
}

impl TestApp {
    pub fn new() -> Self {
        let users = MemoryUserDirectory::new();
        let store = Arc::new(FaultySessionStore::default());
        let service = SessionService::new(
            Arc::new(users.clone()),
            store.clone(),
            &AuthConfig::with_secret(SIGNING_KEY),
        );

        Self {
            service,
            users,
            store,
            decoder: JwtDecoder::new(SIGNING_KEY.as_bytes()),
        }
    }

    /// Registers a user whose stored digest is the SHA-256 of `password`.
    pub async fn create_test_user(&self, login: &str, password: &str, role: &str) -> i64 {
        self.users.add_user(login, &sha256_hex(password), role).await
    }

    pub async fn login(&self, login: &str, password: &str) -> Result<TokenPair, AppError> {
        self.service.create(&Credentials::new(login, password)).await
    }

    pub fn claims(&self, pair: &TokenPair) -> Claims {
        self.decoder
            .decode(&pair.access_token)
            .expect("access token should verify")
    }

    /// Session bound to a still stored refresh token.
    pub async fn session_of(&self, pair: &TokenPair) -> i64 {
        self.store
            .inner
            .find_token(&pair.refresh_token)
            .await
            .expect("refresh token should be stored")
            .session_id
    }
}
