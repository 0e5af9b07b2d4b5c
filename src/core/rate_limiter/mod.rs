//! Rate Limiting Implementation
//!
//! Store-backed limiters sharing one atomic window pipeline: a plain sliding window and an
//! exponential backoff that tightens the window as a key accumulates violations.

mod backoff;
mod sliding_window;
mod types;


// Re-export public types
pub use backoff::BackoffLimiter;
pub use sliding_window::SlidingWindowLimiter;
pub use types::{BackoffRejection, RateLimitRejection, RateLimitResult, WindowRejection};

use crate::config::LimiterConfig;
use crate::storage::EphemeralStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// A configured limiter with a uniform admission check
#[async_trait]
pub trait Limiter: Send + Sync {
    /// Strategy name used in logs and status output
    fn strategy(&self) -> &'static str;

    /// Prefix of every key this limiter writes
    fn key_prefix(&self) -> &str;

    /// Result returned when the store cannot be consulted
    fn fail_open_result(&self) -> RateLimitResult;

    /// Record an attempt by `subject` and decide it, propagating store faults
    async fn evaluate(&self, subject: &str) -> Result<RateLimitResult>;

    /// Clear all state held for `subject`
    async fn reset(&self, subject: &str) -> Result<()>;

    /// Request-log keys whose subject starts with `subject_prefix`
    async fn active_keys(&self, subject_prefix: &str) -> Result<Vec<String>>;

    /// Record an attempt by `subject` and decide it.
    ///
    /// Store faults admit the request and are logged.
    async fn check(&self, subject: &str) -> RateLimitResult {
        match self.evaluate(subject).await {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    error = %e,
                    strategy = self.strategy(),
                    subject,
                    "Rate limiter store fault, admitting request"
                );
                self.fail_open_result()
            }
        }
    }
}

/// Build the limiter described by `config` on top of `store`
pub fn build_limiter(config: &LimiterConfig, store: Arc<dyn EphemeralStore>) -> Arc<dyn Limiter> {
    match config {
        LimiterConfig::SlidingWindow(c) => Arc::new(SlidingWindowLimiter::new(c.clone(), store)),
        LimiterConfig::Backoff(c) => Arc::new(BackoffLimiter::new(c.clone(), store)),
    }
}

/// Escape glob metacharacters so `raw` matches only itself in `keys_matching`
pub(crate) fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
