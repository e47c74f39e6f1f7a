//! Session lifecycle: login, refresh-token rotation, and logout.

use std::future::Future;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, error, info, warn};

use elib_core::config::AuthConfig;
use elib_core::error::{AppError, ErrorKind};
use elib_entity::session::{RefreshToken, TokenPair};
use elib_entity::user::Credentials;

use crate::jwt::JwtEncoder;
use crate::password::PasswordHasher;
use crate::token::RefreshTokenFactory;

use super::directory::UserDirectory;
use super::store::SessionStore;

/// Issues, rotates, and revokes sessions.
///
/// Stateless apart from its collaborators; clone freely and share across
/// request handlers.
#[derive(Clone)]
pub struct SessionService {
    /// Credential and role lookup.
    users: Arc<dyn UserDirectory>,
    /// Session and refresh token persistence.
    sessions: Arc<dyn SessionStore>,
    /// Password digest verification.
    password_hasher: Arc<PasswordHasher>,
    /// Access token signing.
    jwt_encoder: Arc<JwtEncoder>,
    /// Refresh token generation.
    refresh_tokens: RefreshTokenFactory,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("users", &self.users)
            .field("sessions", &self.sessions)
            .field("refresh_tokens", &self.refresh_tokens)
            .finish()
    }
}

impl SessionService {
    /// Creates a session service from its collaborators and the auth settings.
    ///
    /// The signing key is taken from `config` once; nothing is read from the
    /// environment afterwards. `config` is expected to have passed
    /// [`AuthConfig::validate`].
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            password_hasher: Arc::new(PasswordHasher::new(config.password_scheme)),
            jwt_encoder: Arc::new(JwtEncoder::new(
                config.jwt_secret.as_bytes(),
                Duration::minutes(config.access_token_ttl_minutes),
            )),
            refresh_tokens: RefreshTokenFactory::new(Duration::days(
                config.refresh_token_ttl_days,
            )),
        }
    }

    /// Authenticates `credentials` and opens a new session.
    ///
    /// 1. Look up the stored credentials
    /// 2. Verify the password digest
    /// 3. Resolve the current role and sign the access token
    /// 4. Open the session together with its first refresh token
    ///
    /// The access token is signed before anything is written, so a failure
    /// at any step leaves no session behind.
    pub async fn create(&self, credentials: &Credentials) -> Result<TokenPair, AppError> {
        let stored = self
            .users
            .get_credentials_by_username(&credentials.username)
            .await
            .map_err(|e| e.context("create session: look up credentials"))?;

        let password_valid = self
            .password_hasher
            .verify_password(&credentials.password, &stored.password_hash)
            .map_err(|e| e.context("create session: verify password"))?;
        if !password_valid {
            warn!(user_id = stored.user_id, "Login rejected: password mismatch");
            return Err(AppError::invalid_password("invalid password").context("create session"));
        }

        let role = self
            .users
            .get_role(stored.user_id)
            .await
            .map_err(|e| {
                // Credentials were just found, so a missing role row is a storage fault.
                if e.is(ErrorKind::NotFound) {
                    AppError::internal(e.message).context("create session: resolve role")
                } else {
                    e.context("create session: resolve role")
                }
            })?;

        let access = self
            .jwt_encoder
            .sign(stored.user_id, &role)
            .map_err(|e| e.context("create session: sign access token"))?;

        let refresh = self
            .sessions
            .create_session(stored.user_id, &self.refresh_tokens.issue())
            .await
            .map_err(|e| e.context("create session: store session"))?;

        info!(
            user_id = stored.user_id,
            session_id = refresh.session_id,
            role = %role,
            "Session created"
        );

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.refresh_token,
            refresh_expires_at: refresh.expires_at,
        })
    }

    /// Consumes `refresh_token` and issues a replacement pair for the same
    /// session.
    ///
    /// Once the token is popped the refresh either completes or the session
    /// is ended; a dropped caller does not interrupt that.
    pub async fn update(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let popped = self
            .sessions
            .pop_refresh_token(refresh_token)
            .await
            .map_err(|e| e.context("update session: pop refresh token"))?;

        let this = self.clone();
        run_to_completion(async move { this.finish_update(popped).await }).await
    }

    /// Consumes `refresh_token` and ends its session.
    ///
    /// An unknown or already consumed token is treated as a completed logout.
    pub async fn delete(&self, refresh_token: &str) -> Result<(), AppError> {
        let popped = match self.sessions.pop_refresh_token(refresh_token).await {
            Ok(popped) => popped,
            Err(e) if e.is(ErrorKind::NotFound) => {
                debug!("Logout with unknown refresh token, nothing to end");
                return Ok(());
            }
            Err(e) => return Err(e.context("delete session: pop refresh token")),
        };

        let sessions = Arc::clone(&self.sessions);
        run_to_completion(async move {
            sessions
                .end_session(popped.session_id)
                .await
                .map_err(|e| e.context("delete session: end session"))?;
            info!(session_id = popped.session_id, "Session ended by logout");
            Ok::<(), AppError>(())
        })
        .await
    }

    /// Remainder of a refresh after the pop; ends the session on any failure.
    async fn finish_update(&self, popped: RefreshToken) -> Result<TokenPair, AppError> {
        let session_id = popped.session_id;

        match self.rotate(popped).await {
            Ok(pair) => {
                info!(session_id, "Session refreshed");
                Ok(pair)
            }
            Err(err) => {
                warn!(session_id, error = %err, "Refresh failed, ending session");
                if let Err(cleanup) = self.sessions.end_session(session_id).await {
                    error!(
                        session_id,
                        error = %cleanup,
                        "Failed to end session after refresh failure"
                    );
                }
                Err(err)
            }
        }
    }

    /// Checks expiry, re-reads the role, signs, and stores the next token.
    ///
    /// The replacement token is written last so a failure never leaves a
    /// live token behind for a session that is about to be ended.
    async fn rotate(&self, popped: RefreshToken) -> Result<TokenPair, AppError> {
        if popped.is_expired_at(Utc::now().timestamp()) {
            return Err(AppError::refresh_expired("refresh token expired").context("update session"));
        }

        let user_id = self
            .sessions
            .get_user_id_for_session(popped.session_id)
            .await
            .map_err(|e| e.context("update session: resolve session owner"))?;

        let role = self
            .users
            .get_role(user_id)
            .await
            .map_err(|e| e.context("update session: resolve role"))?;

        let access = self
            .jwt_encoder
            .sign(user_id, &role)
            .map_err(|e| e.context("update session: sign access token"))?;

        let next = self
            .sessions
            .rotate_refresh_token(popped.session_id, &self.refresh_tokens.issue())
            .await
            .map_err(|e| e.context("update session: store refresh token"))?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: next.refresh_token,
            refresh_expires_at: next.expires_at,
        })
    }
}

/// Runs `fut` on its own task and waits for it.
///
/// Dropping the returned future detaches the task instead of cancelling it,
/// so work that follows a pop always reaches a consistent end state.
async fn run_to_completion<T, F>(fut: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, AppError>> + Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| AppError::internal(format!("session task failed: {e}")))?
}
