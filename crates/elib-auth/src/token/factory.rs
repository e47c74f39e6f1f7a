//! Refresh token factory.

use chrono::{DateTime, Duration, Utc};

use elib_entity::session::NewRefreshToken;

/// Number of random bytes behind every refresh token.
const TOKEN_BYTES: usize = 32;

/// Mints opaque refresh tokens with a fixed lifetime.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTokenFactory {
    ttl: Duration,
}

impl RefreshTokenFactory {
    /// Creates a factory whose tokens live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Returns the configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token expiring `ttl` from now.
    pub fn issue(&self) -> NewRefreshToken {
        self.issue_at(Utc::now())
    }

    /// Issues a token expiring `ttl` from `now`.
    ///
    /// The token is 32 bytes from the thread-local CSPRNG, hex encoded.
    pub fn issue_at(&self, now: DateTime<Utc>) -> NewRefreshToken {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        NewRefreshToken {
            refresh_token: hex::encode(bytes),
            expires_at: (now + self.ttl).timestamp(),
        }
    }
}
