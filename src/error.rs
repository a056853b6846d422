//! Error types for the Gather SDK.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Main error type for the Gather SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid client setup. Raised at construction time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network-level failure: no response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// A 2xx response whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client-side rate ledger rejected the request.
    #[error("Rate limit exceeded for tier '{tier}', retry after {retry_after:?}")]
    RateLimitExceeded { tier: String, retry_after: Duration },

    /// Gather API error
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Whether the transport may retry after this error.
    ///
    /// Network failures and transient API errors (429, 5xx) are retryable.
    /// Client-side rate limiting is not: the caller decides when to try again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// HTTP status of the last response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status()),
            _ => None,
        }
    }

    /// Server- or ledger-provided wait hint.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitExceeded { retry_after, .. } => Some(*retry_after),
            Self::Api(err) => err.retry_after(),
            _ => None,
        }
    }
}

/// Typed errors for Gather API responses.
///
/// Each variant corresponds to one row of the status classification table
/// in [`ApiError::from_status`].
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Rejected request payload (400). Carries the payload that was sent.
    #[error("[400] {message}")]
    Validation {
        message: String,
        payload: Option<Value>,
    },

    /// Access denied (403).
    #[error("[403] {message}")]
    Permission { message: String },

    /// Conflict, e.g. a duplicate guest (409).
    #[error("[409] {message}")]
    Conflict { message: String },

    /// Server-side rate limiting (429).
    #[error("[429] {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// Server errors (5xx).
    #[error("[{status}] {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status.
    #[error("[{status}] {message}")]
    Request { status: u16, message: String },
}

impl ApiError {
    /// Classify a non-success HTTP status.
    ///
    /// `payload` is the request body that was sent; it is kept only for
    /// validation failures.
    #[must_use]
    pub fn from_status(
        status: u16,
        message: String,
        payload: Option<Value>,
        retry_after: Option<Duration>,
    ) -> Self {
        match status {
            400 => Self::Validation { message, payload },
            403 => Self::Permission { message },
            409 => Self::Conflict { message },
            429 => Self::RateLimited {
                message,
                retry_after,
            },
            s if s >= 500 => Self::Server { status: s, message },
            s => Self::Request { status: s, message },
        }
    }

    /// Get the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Permission { .. } => 403,
            Self::Conflict { .. } => 409,
            Self::RateLimited { .. } => 429,
            Self::Server { status, .. } | Self::Request { status, .. } => *status,
        }
    }

    /// Get the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Permission { message }
            | Self::Conflict { message }
            | Self::RateLimited { message, .. }
            | Self::Server { message, .. }
            | Self::Request { message, .. } => message,
        }
    }

    /// Get the retry-after hint for rate limited errors.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Check if this error is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;
