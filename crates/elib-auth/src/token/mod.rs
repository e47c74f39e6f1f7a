//! Opaque refresh token generation.

pub mod factory;

pub use factory::RefreshTokenFactory;
