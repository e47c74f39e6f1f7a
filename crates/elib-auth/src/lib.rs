//! # elib-auth
//!
//! Credential verification and session lifecycle for the library backend.
//!
//! ## Modules
//!
//! - `password` — stored password digests (SHA-256, optional Argon2id)
//! - `jwt` — access token signing and verification
//! - `token` — opaque refresh token generation
//! - `session` — login, refresh rotation, logout, and the storage traits

pub mod jwt;
pub mod password;
pub mod session;
pub mod token;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, SignedAccessToken};
pub use password::PasswordHasher;
pub use session::{
    MemorySessionStore, MemoryUserDirectory, SessionService, SessionStore, UserDirectory,
};
pub use token::RefreshTokenFactory;
