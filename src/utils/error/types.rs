//! Error types for the admission gate

use crate::core::rate_limiter::RateLimitRejection;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for the admission gate
pub type Result<T> = std::result::Result<T, GateError>;

/// Main error type for the admission gate
#[derive(Error, Debug)]
pub enum GateError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store cannot be reached or has been closed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A store command failed (wrong value type, malformed reply)
    #[error("Store error: {0}")]
    Store(String),

    /// Redis errors
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A store call exceeded its bounded timeout
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// The caller exceeded a rate limit and may retry after the reported delay
    #[error("Rate limit exceeded: retry after {} seconds", .0.retry_after())]
    RateLimitExceeded(RateLimitRejection),

    /// An unsafe request carried no CSRF token
    #[error("CSRF token missing")]
    CsrfTokenMissing,

    /// The supplied CSRF token does not match the session's secret
    #[error("Invalid CSRF token")]
    CsrfTokenInvalid,

    /// No live CSRF record exists for the session
    #[error("CSRF token expired")]
    CsrfTokenExpired,

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
