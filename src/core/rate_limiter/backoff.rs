//! Exponential-backoff limiter
//!
//! Each rejection bumps a per-key violation counter. The counter doubles the window and
//! halves the quota for the next attempt, clamped at `max_window_ms` and a quota of one.
//! Admissions never touch the counter; it decays only when its expiry lapses.

use super::sliding_window::window_check;
use super::types::{BackoffRejection, RateLimitRejection, RateLimitResult};
use super::{Limiter, escape_glob};
use crate::config::BackoffConfig;
use crate::storage::EphemeralStore;
use crate::utils::error::{GateError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const VIOLATIONS_SUFFIX: &str = ":violations";

pub struct BackoffLimiter {
    config: BackoffConfig,
    store: Arc<dyn EphemeralStore>,
}

impl BackoffLimiter {
    pub fn new(config: BackoffConfig, store: Arc<dyn EphemeralStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    /// `min(base_window_ms * 2^violations, max_window_ms)`
    pub fn window_for(&self, violations: u32) -> u64 {
        self.config
            .base_window_ms
            .saturating_mul(2u64.saturating_pow(violations))
            .min(self.config.max_window_ms)
    }

    /// `max(1, floor(base_quota / 2^violations))`
    pub fn quota_for(&self, violations: u32) -> u32 {
        self.config
            .base_quota
            .checked_shr(violations)
            .unwrap_or(0)
            .max(1)
    }

    /// Current violation count for `subject` (zero when absent or expired)
    pub async fn violations(&self, subject: &str) -> Result<u32> {
        self.read_violations(&self.violations_key(subject)).await
    }

    fn key(&self, subject: &str) -> String {
        format!("{}:{}", self.config.key_prefix, subject)
    }

    fn violations_key(&self, subject: &str) -> String {
        format!("{}{}", self.key(subject), VIOLATIONS_SUFFIX)
    }

    async fn read_violations(&self, key: &str) -> Result<u32> {
        match self.store.get(key).await? {
            None => Ok(0),
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                GateError::store(format!("violation counter at {key:?} is not a count: {raw:?}"))
            }),
        }
    }
}

#[async_trait]
impl Limiter for BackoffLimiter {
    fn strategy(&self) -> &'static str {
        "backoff"
    }

    fn key_prefix(&self) -> &str {
        &self.config.key_prefix
    }

    fn fail_open_result(&self) -> RateLimitResult {
        RateLimitResult::fail_open(self.config.base_quota, self.config.base_window_ms)
    }

    async fn evaluate(&self, subject: &str) -> Result<RateLimitResult> {
        let key = self.key(subject);
        let violations_key = self.violations_key(subject);

        let violations = self.read_violations(&violations_key).await?;
        let window_ms = self.window_for(violations);
        let quota = self.quota_for(violations);

        // grown windows must still see entries admitted under a shorter one
        let outcome = window_check(
            self.store.as_ref(),
            &key,
            window_ms,
            quota,
            self.config.max_window_ms,
        )
        .await?;

        if outcome.allowed {
            debug!(
                key = %key,
                violations,
                current_count = outcome.current_count,
                quota,
                window_ms,
                "Attempt admitted"
            );
            return Ok(RateLimitResult {
                allowed: true,
                current_count: outcome.current_count,
                limit: quota,
                remaining: outcome.remaining,
                window_ms,
                retry_after_secs: None,
                violation_count: Some(violations),
                fail_open: false,
                rejection: None,
            });
        }

        let counter_ttl = Duration::from_millis(self.config.max_window_ms);
        let violation_count = match self.store.increment(&violations_key, counter_ttl).await {
            Ok(count) => u32::try_from(count.max(0)).unwrap_or(u32::MAX),
            Err(e) => {
                warn!(
                    error = %e,
                    key = %violations_key,
                    "Failed to record violation, reporting an estimated count"
                );
                violations.saturating_add(1)
            }
        };

        let next_window_ms = self.window_for(violation_count.saturating_add(1));
        let current_max = self.quota_for(violation_count);
        let retry_after = next_window_ms.div_ceil(1000).max(1);

        warn!(
            key = %key,
            violation_count,
            current_max,
            window_ms = next_window_ms,
            retry_after,
            "Backoff limit exceeded"
        );

        Ok(RateLimitResult {
            allowed: false,
            current_count: outcome.current_count,
            limit: current_max,
            remaining: 0,
            window_ms: next_window_ms,
            retry_after_secs: Some(retry_after),
            violation_count: Some(violation_count),
            fail_open: false,
            rejection: Some(RateLimitRejection::Backoff(BackoffRejection {
                retry_after,
                violation_count,
                current_max,
                window_ms: next_window_ms,
            })),
        })
    }

    async fn reset(&self, subject: &str) -> Result<()> {
        self.store.delete(&self.key(subject)).await?;
        self.store.delete(&self.violations_key(subject)).await
    }

    async fn active_keys(&self, subject_prefix: &str) -> Result<Vec<String>> {
        let pattern = format!(
            "{}:{}*",
            escape_glob(&self.config.key_prefix),
            escape_glob(subject_prefix)
        );
        let keys = self.store.keys_matching(&pattern).await?;
        Ok(keys
            .into_iter()
            .filter(|key| !key.ends_with(VIOLATIONS_SUFFIX))
            .collect())
    }
}
