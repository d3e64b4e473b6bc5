//! # AppError
//!
//! Centralized error handling for the StackIt services.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Question, Answer, Comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty title, malformed payload)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// No usable session, or the session no longer maps to a user
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to touch this resource
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Infrastructure failure (e.g., DB down, hashing failure)
    #[error("internal service error: {0}")]
    Internal(String),

    /// Resource already exists (e.g., duplicate username)
    #[error("conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound(entity.to_string(), id.to_string())
    }

    /// The message shown to API clients.
    ///
    /// Internal failures are collapsed to a fixed string so store errors
    /// never leak out of the process.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(entity, _) => format!("{entity} not found"),
            Self::ValidationError(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Internal(_) => "Server error".to_string(),
        }
    }
}

/// Why a session token was rejected.
///
/// Each cause carries its own client-facing message so callers can tell
/// an expired session from a forged one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Access denied. No token provided.")]
    Missing,

    #[error("Invalid token.")]
    Invalid,

    #[error("Token expired.")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// A specialized Result type for StackIt logic.
pub type Result<T> = std::result::Result<T, AppError>;
