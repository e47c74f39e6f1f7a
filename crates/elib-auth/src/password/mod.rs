//! Password hashing and verification.

pub mod hasher;

pub use hasher::{PasswordHasher, sha256_hex};
