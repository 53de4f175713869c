//! Error types for the payments client.
//!
//! Provides the error taxonomy for configuration, credential, and
//! connection failures. Every variant carries owned data only, so the
//! enum is `Clone`: a memoized construction failure is handed back to
//! every caller that acquires the client after the first attempt.

use std::error::Error as _;

use thiserror::Error;

/// Result type alias for payments client operations.
pub type PaymentsResult<T> = Result<T, PaymentsError>;

/// Error type for payments client operations.
#[derive(Debug, Clone, Error)]
pub enum PaymentsError {
    /// Configuration error (invalid base URL, empty source chain, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Credential rejected (malformed or unusable secret key).
    #[error("Credential rejected: {message}")]
    Credential {
        /// Error message describing why the key was rejected.
        message: String,
        /// Hint about the key (last 4 chars).
        key_hint: Option<String>,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
        /// Underlying cause.
        cause: Option<String>,
    },

    /// Timeout error.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },
}

impl PaymentsError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        PaymentsError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a credential error.
    pub fn credential(message: impl Into<String>, key_hint: Option<String>) -> Self {
        PaymentsError::Credential {
            message: message.into(),
            key_hint,
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Configuration and credential errors are permanent for the process
    /// lifetime; only transport-level failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentsError::Network { .. } | PaymentsError::Timeout { .. }
        )
    }
}

impl From<reqwest::Error> for PaymentsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PaymentsError::Timeout {
                message: err.to_string(),
            }
        } else {
            PaymentsError::Network {
                message: err.to_string(),
                cause: err.source().map(|e| e.to_string()),
            }
        }
    }
}

impl From<url::ParseError> for PaymentsError {
    fn from(err: url::ParseError) -> Self {
        PaymentsError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
