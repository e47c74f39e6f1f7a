//! Unified application error types for the library backend.
//!
//! Every crate maps its internal failures into [`AppError`]. The error
//! carries an [`ErrorKind`] that callers classify on; wrapping an error with
//! extra context never changes its kind.

use std::fmt;
use thiserror::Error;

/// Error categories shared by every layer of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No user is registered under the presented username.
    InvalidLogin,
    /// The username exists but the presented password does not match.
    InvalidPassword,
    /// A refresh token existed but was past its expiry when it was consumed.
    RefreshExpired,
    /// The requested row is absent (unknown or already consumed token, missing user).
    NotFound,
    /// An access token is malformed, badly signed, or expired.
    Unauthorized,
    /// Storage, signing, or any other server-side failure.
    Internal,
    /// Configuration is missing or invalid.
    Configuration,
    /// Input failed validation before reaching the domain logic.
    Validation,
}

impl ErrorKind {
    /// Kinds surfaced to callers as an authentication failure.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidLogin | Self::InvalidPassword | Self::RefreshExpired | Self::Unauthorized
        )
    }

    /// Kinds whose details must never reach an external caller.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Configuration)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLogin => write!(f, "INVALID_LOGIN"),
            Self::InvalidPassword => write!(f, "INVALID_PASSWORD"),
            Self::RefreshExpired => write!(f, "REFRESH_EXPIRED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Validation => write!(f, "VALIDATION"),
        }
    }
}

/// The unified application error.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message, including any operation context.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-login error.
    pub fn invalid_login(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidLogin, message)
    }

    /// Create an invalid-password error.
    pub fn invalid_password(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPassword, message)
    }

    /// Create a refresh-expired error.
    pub fn refresh_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RefreshExpired, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Prefix the message with operation context, keeping the kind and cause.
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Message safe to show to an external caller.
    pub fn public_message(&self) -> String {
        if self.kind.is_internal() {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind() {
        let err = AppError::refresh_expired("token expired")
            .context("pop the refresh token")
            .context("update the session");

        assert_eq!(err.kind, ErrorKind::RefreshExpired);
        assert_eq!(
            err.message,
            "update the session: pop the refresh token: token expired"
        );
    }

    #[test]
    fn public_message_hides_internal_detail() {
        let err = AppError::internal("connection refused to 10.0.0.3:5432");
        assert_eq!(err.public_message(), "internal error");

        let err = AppError::invalid_password("invalid password");
        assert_eq!(err.public_message(), "INVALID_PASSWORD: invalid password");
    }

    #[test]
    fn authentication_failure_kinds() {
        assert!(ErrorKind::InvalidLogin.is_authentication_failure());
        assert!(ErrorKind::InvalidPassword.is_authentication_failure());
        assert!(ErrorKind::RefreshExpired.is_authentication_failure());
        assert!(!ErrorKind::NotFound.is_authentication_failure());
        assert!(!ErrorKind::Internal.is_authentication_failure());
    }
}
