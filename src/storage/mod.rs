//! Ephemeral key-value storage
//!
//! Every piece of gate state (request logs, violation counters, CSRF records) lives in an
//! [`EphemeralStore`]: keys with per-key expiry, an atomic window pipeline and pattern
//! enumeration. Implementations are injected into limiters and the CSRF manager.
//!
//! ## Module Structure
//!
//! - `pipeline` - Window pipeline request/response types
//! - `memory` - In-process store backed by `DashMap`
//! - `redis` - Redis store (feature `redis`)
//! - `timed` - Decorator bounding every call with a timeout

pub mod memory;
pub mod pipeline;
#[cfg(feature = "redis")]
pub mod redis;
pub mod timed;

pub use memory::MemoryStore;
pub use pipeline::{WindowPipeline, WindowSnapshot};
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;
pub use timed::TimedStore;

use crate::config::StorageConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Interval between sweeps of expired entries in the memory store
const MEMORY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Key-value store with per-key expiry and atomic single-key pipelines
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Backend name used in logs
    fn backend(&self) -> &'static str;

    /// Liveness probe
    async fn ping(&self) -> Result<()>;

    /// Release resources held by the store
    async fn close(&self) -> Result<()>;

    /// Read a value; expired keys read as absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value with an expiry
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove a key (no-op when absent)
    async fn delete(&self, key: &str) -> Result<()>;

    /// Live keys matching a glob pattern (`*`, `?`, `[...]`)
    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>>;

    /// Atomically add one to a counter, refresh its expiry and return the new value
    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64>;

    /// Execute a window pipeline atomically against the log stored at `key`
    async fn run_window(&self, key: &str, pipeline: &WindowPipeline) -> Result<WindowSnapshot>;
}

/// Connect the store described by the storage configuration.
///
/// Redis is used when enabled and reachable. An unreachable Redis at startup degrades to
/// the in-memory store. The returned store bounds every call with the configured timeout.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn EphemeralStore>> {
    info!("Initializing ephemeral store");
    let timeout = Duration::from_millis(config.operation_timeout_ms);

    let inner: Arc<dyn EphemeralStore> = if config.redis.enabled {
        connect_redis(config).await
    } else {
        debug!("Redis disabled, using in-memory store");
        memory_store()
    };

    info!(backend = inner.backend(), timeout_ms = config.operation_timeout_ms, "Ephemeral store ready");
    Ok(Arc::new(TimedStore::new(inner, timeout)))
}

#[cfg(feature = "redis")]
async fn connect_redis(config: &StorageConfig) -> Arc<dyn EphemeralStore> {
    debug!("Connecting to Redis");
    match RedisStore::connect(&config.redis).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Redis connection failed, continuing with in-memory store");
            memory_store()
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_config: &StorageConfig) -> Arc<dyn EphemeralStore> {
    warn!("Redis enabled in configuration but the `redis` feature is not compiled in");
    memory_store()
}

fn memory_store() -> Arc<dyn EphemeralStore> {
    let store = Arc::new(MemoryStore::new());
    Arc::clone(&store).start_cleanup_task(MEMORY_SWEEP_INTERVAL);
    store
}
