//! Error types for outbound delivery.
//!
//! A delivery error means no HTTP response was obtained from the
//! destination. A response with a failing status is not an error at this
//! layer; callers inspect `ForwardResponse::is_success` instead.

use std::time::Duration;

use tablehook_core::RelayError;
use thiserror::Error;

/// Result type alias for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Failures that prevent a destination from answering.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// Connection could not be established or was interrupted.
    #[error("network connection failed: {message}")]
    NetworkError {
        /// Error message describing the network failure
        message: String,
    },

    /// Configured client timeout elapsed before a response arrived.
    #[error("request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// Request could not be built, typically an unusable destination URL.
    #[error("invalid delivery request: {message}")]
    InvalidRequest {
        /// Error message from the request builder
        message: String,
    },

    /// HTTP client could not be constructed.
    #[error("invalid client configuration: {message}")]
    ConfigurationError {
        /// Configuration error message
        message: String,
    },
}

impl DeliveryError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    /// Creates a timeout error for the configured `timeout`.
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX) }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError { message: message.into() }
    }
}

impl From<DeliveryError> for RelayError {
    fn from(error: DeliveryError) -> Self {
        Self::Other(anyhow::Error::new(error))
    }
}
