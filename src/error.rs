//! Error types for CareerChat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for CareerChat operations
///
/// Library functions return [`Result`], an `anyhow` alias. Callers that need
/// to react to a specific failure (for example to offer a retry after an AI
/// failure) downcast with `err.downcast_ref::<CareerError>()`.
#[derive(Error, Debug)]
pub enum CareerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// AI provider errors (network, quota, malformed output)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Local state or history storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A chat session id did not match any session
    #[error("Chat session not found: {0}")]
    SessionNotFound(String),

    /// A history item id did not match any stored item
    #[error("History item not found: {0}")]
    HistoryNotFound(String),

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// AI output could not be parsed into the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl CareerError {
    /// Returns true for failures the user can retry without changing input
    ///
    /// # Examples
    ///
    /// ```
    /// use careerchat::error::CareerError;
    ///
    /// assert!(CareerError::Provider("quota".into()).is_retryable());
    /// assert!(!CareerError::SessionNotFound("x".into()).is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

/// Result type alias for CareerChat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
