// src/error.rs

//! Unified error handling for the book search pipeline.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Coarse classification of an [`AppError`], used by boundary adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied invalid input.
    Validation,
    /// A single upstream request failed.
    Upstream,
    /// Anything else.
    Unexpected,
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream request error
    #[error("Upstream error for {context}: {message}")]
    Upstream { context: String, message: String },

    /// Error produced by a load that other callers were waiting on
    #[error(transparent)]
    Shared(#[from] Arc<AppError>),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an upstream error with context.
    pub fn upstream(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Upstream {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Http(_) | Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Shared(inner) => inner.kind(),
            _ => ErrorKind::Unexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_error_keeps_inner_kind() {
        let inner = Arc::new(AppError::validation("bad"));
        let err = AppError::from(inner);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Validation error: bad");
    }

    #[test]
    fn config_error_is_unexpected() {
        assert_eq!(AppError::config("x").kind(), ErrorKind::Unexpected);
        assert_eq!(
            AppError::upstream("isbn 1", "timeout").kind(),
            ErrorKind::Upstream
        );
    }
}
