//! Rate limiter types and data structures

use serde::Serialize;

/// Outcome of a single admission check
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Events in the window (including this one when admitted)
    pub current_count: u32,
    /// Maximum events allowed in the window that applied
    pub limit: u32,
    /// Remaining events in the window
    pub remaining: u32,
    /// Window that applied to this check, in milliseconds
    pub window_ms: u64,
    /// Retry after (in seconds, only set when not allowed)
    pub retry_after_secs: Option<u64>,
    /// Violation count for backoff limiters
    pub violation_count: Option<u32>,
    /// Set when the store failed and the request was admitted without enforcement
    pub fail_open: bool,
    /// Rejection details, present exactly when `allowed` is false
    pub rejection: Option<RateLimitRejection>,
}

impl RateLimitResult {
    /// An admission granted because the store could not be consulted
    pub fn fail_open(limit: u32, window_ms: u64) -> Self {
        Self {
            allowed: true,
            current_count: 0,
            limit,
            remaining: limit,
            window_ms,
            retry_after_secs: None,
            violation_count: None,
            fail_open: true,
            rejection: None,
        }
    }
}

/// Details reported to a rejected caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RateLimitRejection {
    /// Rejection from a sliding-window limiter
    Window(WindowRejection),
    /// Rejection from an exponential-backoff limiter
    Backoff(BackoffRejection),
}

/// Sliding-window rejection body fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRejection {
    pub retry_after: u64,
    pub current_count: u32,
    pub max_requests: u32,
    pub window_ms: u64,
}

/// Backoff rejection body fields, describing the penalty tier after this violation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackoffRejection {
    pub retry_after: u64,
    pub violation_count: u32,
    pub current_max: u32,
    pub window_ms: u64,
}

impl RateLimitRejection {
    /// Seconds the caller should wait before retrying
    pub fn retry_after(&self) -> u64 {
        match self {
            Self::Window(r) => r.retry_after,
            Self::Backoff(r) => r.retry_after,
        }
    }

    /// Window reported to the caller, in milliseconds
    pub fn window_ms(&self) -> u64 {
        match self {
            Self::Window(r) => r.window_ms,
            Self::Backoff(r) => r.window_ms,
        }
    }

    /// Short `error` label for the response body
    pub fn error_label(&self) -> &'static str {
        match self {
            Self::Window(_) => "Too many requests",
            Self::Backoff(_) => "Too many attempts",
        }
    }

    /// Human-readable `message` for the response body
    pub fn message(&self) -> String {
        match self {
            Self::Window(r) => format!(
                "Rate limit of {} requests exceeded. Try again in {} seconds.",
                r.max_requests, r.retry_after
            ),
            Self::Backoff(r) => format!(
                "Too many attempts ({} violations). Try again in {} seconds.",
                r.violation_count, r.retry_after
            ),
        }
    }
}
