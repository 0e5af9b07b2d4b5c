//! Sliding-window limiter

use super::types::{RateLimitRejection, RateLimitResult, WindowRejection};
use super::{Limiter, escape_glob};
use crate::config::SlidingWindowConfig;
use crate::storage::{EphemeralStore, WindowPipeline};
use crate::utils::crypto::log_member;
use crate::utils::error::Result;
use crate::utils::time::now_millis;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Decision of one window pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowOutcome {
    pub allowed: bool,
    /// Events in the window, counting this one when admitted
    pub current_count: u32,
    pub remaining: u32,
    /// Seconds until the oldest entry leaves the window (rejections only)
    pub retry_after_secs: Option<u64>,
}

/// Record an event at `key` if fewer than `limit` events fall in the trailing `window_ms`.
///
/// The log is kept for `log_ttl_ms`, which must be at least any window later checks apply.
pub(crate) async fn window_check(
    store: &dyn EphemeralStore,
    key: &str,
    window_ms: u64,
    limit: u32,
    log_ttl_ms: u64,
) -> Result<WindowOutcome> {
    let now = now_millis();
    let pipeline = WindowPipeline::new(now, window_ms, limit, log_member(now))
        .with_ttl(Duration::from_millis(log_ttl_ms.max(window_ms)));
    let snapshot = store.run_window(key, &pipeline).await?;

    if snapshot.inserted {
        let current_count = snapshot.count.saturating_add(1);
        return Ok(WindowOutcome {
            allowed: true,
            current_count,
            remaining: limit.saturating_sub(current_count),
            retry_after_secs: None,
        });
    }

    let oldest = snapshot.oldest_score.unwrap_or(now);
    let wait_ms = oldest.saturating_add(window_ms).saturating_sub(now);
    Ok(WindowOutcome {
        allowed: false,
        current_count: snapshot.count,
        remaining: 0,
        retry_after_secs: Some(wait_ms.div_ceil(1000).max(1)),
    })
}

/// Bounds admitted events per key within a trailing window
pub struct SlidingWindowLimiter {
    config: SlidingWindowConfig,
    store: Arc<dyn EphemeralStore>,
}

impl SlidingWindowLimiter {
    pub fn new(config: SlidingWindowConfig, store: Arc<dyn EphemeralStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &SlidingWindowConfig {
        &self.config
    }

    fn key(&self, subject: &str) -> String {
        format!("{}:{}", self.config.key_prefix, subject)
    }
}

#[async_trait]
impl Limiter for SlidingWindowLimiter {
    fn strategy(&self) -> &'static str {
        "sliding_window"
    }

    fn key_prefix(&self) -> &str {
        &self.config.key_prefix
    }

    fn fail_open_result(&self) -> RateLimitResult {
        RateLimitResult::fail_open(self.config.max_requests, self.config.window_ms)
    }

    async fn evaluate(&self, subject: &str) -> Result<RateLimitResult> {
        let key = self.key(subject);
        let window_ms = self.config.window_ms;
        let max_requests = self.config.max_requests;

        let outcome =
            window_check(self.store.as_ref(), &key, window_ms, max_requests, window_ms).await?;

        let rejection = match outcome.retry_after_secs {
            Some(retry_after) if !outcome.allowed => {
                warn!(
                    key = %key,
                    current_count = outcome.current_count,
                    max_requests,
                    retry_after,
                    "Rate limit exceeded"
                );
                Some(RateLimitRejection::Window(WindowRejection {
                    retry_after,
                    current_count: outcome.current_count,
                    max_requests,
                    window_ms,
                }))
            }
            _ => {
                debug!(
                    key = %key,
                    current_count = outcome.current_count,
                    max_requests,
                    "Request admitted"
                );
                None
            }
        };

        Ok(RateLimitResult {
            allowed: outcome.allowed,
            current_count: outcome.current_count,
            limit: max_requests,
            remaining: outcome.remaining,
            window_ms,
            retry_after_secs: outcome.retry_after_secs,
            violation_count: None,
            fail_open: false,
            rejection,
        })
    }

    async fn reset(&self, subject: &str) -> Result<()> {
        self.store.delete(&self.key(subject)).await
    }

    async fn active_keys(&self, subject_prefix: &str) -> Result<Vec<String>> {
        let pattern = format!(
            "{}:{}*",
            escape_glob(&self.config.key_prefix),
            escape_glob(subject_prefix)
        );
        self.store.keys_matching(&pattern).await
    }
}
