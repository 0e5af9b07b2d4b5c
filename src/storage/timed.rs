//! Timeout decorator for stores

use super::{EphemeralStore, WindowPipeline, WindowSnapshot};
use crate::utils::error::{GateError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Bounds every call of the wrapped store; an elapsed call fails with [`GateError::Timeout`]
pub struct TimedStore {
    inner: Arc<dyn EphemeralStore>,
    timeout: Duration,
}

impl TimedStore {
    pub fn new(inner: Arc<dyn EphemeralStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Configured per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(GateError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl EphemeralStore for TimedStore {
    fn backend(&self) -> &'static str {
        self.inner.backend()
    }

    async fn ping(&self) -> Result<()> {
        self.bounded(self.inner.ping()).await
    }

    async fn close(&self) -> Result<()> {
        self.bounded(self.inner.close()).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.bounded(self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.bounded(self.inner.set(key, value, ttl)).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.bounded(self.inner.delete(key)).await
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        self.bounded(self.inner.keys_matching(pattern)).await
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64> {
        self.bounded(self.inner.increment(key, ttl)).await
    }

    async fn run_window(&self, key: &str, pipeline: &WindowPipeline) -> Result<WindowSnapshot> {
        self.bounded(self.inner.run_window(key, pipeline)).await
    }
}
