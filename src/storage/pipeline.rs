//! Atomic sliding-window pipeline description
//!
//! A window pipeline is the fixed sequence trim-by-score, cardinality, conditional
//! add-with-score and set-expiry, executed by a store as one indivisible unit against a
//! single sorted log.

use std::time::Duration;

/// One atomic trim / count / add / expire against a request log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPipeline {
    /// Entries with a score at or below this value are removed first
    pub trim_up_to: u64,
    /// The entry is added only when the trimmed cardinality is below this limit
    pub limit: u32,
    /// Score (timestamp in milliseconds) of the new entry
    pub score: u64,
    /// Unique member name of the new entry
    pub member: String,
    /// Expiry applied to the whole log when an entry is added
    pub ttl: Duration,
}

impl WindowPipeline {
    /// Build the pipeline for an event at `now_ms` in a trailing window of `window_ms`
    pub fn new(now_ms: u64, window_ms: u64, limit: u32, member: String) -> Self {
        Self {
            trim_up_to: now_ms.saturating_sub(window_ms),
            limit,
            score: now_ms,
            member,
            ttl: Duration::from_millis(window_ms),
        }
    }

    /// Keep the log alive for `ttl` instead of the trailing window
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// State of the log observed by a window pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSnapshot {
    /// Cardinality after trimming and before the conditional insert
    pub count: u32,
    /// Whether the new entry was added
    pub inserted: bool,
    /// Lowest remaining score in the log, if any
    pub oldest_score: Option<u64>,
}
