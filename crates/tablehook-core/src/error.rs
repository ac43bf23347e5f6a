//! Error taxonomy for the forwarding pipeline.
//!
//! Every failure in a request is one of three kinds, and the kind alone
//! decides the response status and body. Variants keep the underlying cause
//! for logging; the cause never reaches the caller.

use std::fmt;

use thiserror::Error;

/// Result type alias using `RelayError`.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Failures that terminate a forwarding request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No destination is configured for the event's table (E1001).
    #[error("[E1001] Unrouted table: no webhook URL configured for table {table}")]
    UnroutedTable {
        /// Table named by the inbound event
        table: String,
    },

    /// Destination answered with a non-2xx status (E2001).
    #[error("[E2001] Delivery failed: destination responded with HTTP {status}")]
    DeliveryFailed {
        /// HTTP status returned by the destination
        status: u16,
    },

    /// Request body is not a valid change event (E3001).
    #[error("[E3001] Malformed event: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    /// Outbound notification could not be encoded (E3002).
    #[error("[E3002] Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Any other failure, such as the destination being unreachable.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Closed set of outcomes a failure maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Table has no route. Client error.
    UnroutedTable,
    /// Destination signaled failure. Upstream error.
    DeliveryFailure,
    /// Everything else. Internal error.
    UnexpectedFailure,
}

impl RelayError {
    /// Creates an unrouted table error.
    pub fn unrouted(table: impl Into<String>) -> Self {
        Self::UnroutedTable { table: table.into() }
    }

    /// Creates a delivery failure for a destination status code.
    pub fn delivery_failed(status: u16) -> Self {
        Self::DeliveryFailed { status }
    }

    /// Returns the outcome kind used for response mapping.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnroutedTable { .. } => ErrorKind::UnroutedTable,
            Self::DeliveryFailed { .. } => ErrorKind::DeliveryFailure,
            Self::MalformedEvent(_) | Self::Serialization(_) | Self::Other(_) => {
                ErrorKind::UnexpectedFailure
            },
        }
    }

    /// Returns the error code for log correlation.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnroutedTable { .. } => "E1001",
            Self::DeliveryFailed { .. } => "E2001",
            Self::MalformedEvent(_) => "E3001",
            Self::Serialization(_) => "E3002",
            Self::Other(_) => "E3000",
        }
    }
}

impl ErrorKind {
    /// HTTP status code returned to the caller.
    pub const fn status_code(self) -> u16 {
        match self {
            Self::UnroutedTable => 400,
            Self::DeliveryFailure => 502,
            Self::UnexpectedFailure => 500,
        }
    }

    /// Message placed in the `error` field of the response body.
    pub const fn public_message(self) -> &'static str {
        match self {
            Self::UnroutedTable => "No webhook URL configured",
            Self::DeliveryFailure => "Webhook delivery failed",
            Self::UnexpectedFailure => "Internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnroutedTable => write!(f, "unrouted_table"),
            Self::DeliveryFailure => write!(f, "delivery_failure"),
            Self::UnexpectedFailure => write!(f, "unexpected_failure"),
        }
    }
}
