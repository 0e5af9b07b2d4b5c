//! Redis-backed ephemeral store
//!
//! ## Module Structure
//!
//! - `pool` - Connection setup, health checks and shutdown
//! - `cache` - Plain key operations (get, set with expiry, delete, key scans)
//! - `atomic` - Counter increments and the window pipeline script
//! - `tests` - Module tests

mod atomic;
mod cache;
mod pool;

pub use pool::RedisStore;

use super::{EphemeralStore, WindowPipeline, WindowSnapshot};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Millisecond expiry accepted by `PX` / `PEXPIRE` (never zero)
pub(crate) fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX).max(1)
}

#[async_trait]
impl EphemeralStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> Result<()> {
        self.health_check().await
    }

    async fn close(&self) -> Result<()> {
        self.shutdown().await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.set_value(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.delete_key(key).await
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        self.scan_keys(pattern).await
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64> {
        self.increment_with_expiry(key, ttl).await
    }

    async fn run_window(&self, key: &str, pipeline: &WindowPipeline) -> Result<WindowSnapshot> {
        self.run_window_script(key, pipeline).await
    }
}
