//! Redis connection management
//!
//! This module provides Redis connectivity, health checks and shutdown.

use crate::config::RedisConfig;
use crate::utils::error::{GateError, Result};
use redis::{Client, aio::MultiplexedConnection};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Redis store over one multiplexed connection shared by all callers
#[derive(Clone)]
pub struct RedisStore {
    pub(crate) connection: MultiplexedConnection,
    /// Sanitized URL for logs
    pub(crate) display_url: String,
    pub(crate) closed: Arc<AtomicBool>,
}

impl RedisStore {
    /// Open a client and establish the multiplexed connection within the configured timeout
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        info!("Creating Redis store");
        let display_url = Self::sanitize_url(&config.url);
        debug!("Redis URL: {}", display_url);

        let client = Client::open(config.url.as_str())?;
        let timeout = Duration::from_secs(config.connection_timeout.max(1));

        let connection = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| {
                GateError::store_unavailable(format!(
                    "timed out after {timeout:?} connecting to {display_url}"
                ))
            })??;

        info!(url = %display_url, "Redis store connected");
        Ok(Self {
            connection,
            display_url,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle to the shared connection; fails once the store is closed
    pub(crate) fn connection(&self) -> Result<MultiplexedConnection> {
        if self.closed.load(Ordering::Acquire) {
            return Err(GateError::store_unavailable("redis store is closed"));
        }
        Ok(self.connection.clone())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing Redis health check");
        let mut conn = self.connection()?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        debug!("Redis health check passed");
        Ok(())
    }

    /// Mark the store closed; the connection is released when the last clone drops
    pub async fn shutdown(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!(url = %self.display_url, "Redis store closed");
        }
        Ok(())
    }

    /// Sanitize Redis URL for logging (hide password)
    pub(crate) fn sanitize_url(url: &str) -> String {
        if let Ok(parsed) = url::Url::parse(url) {
            let mut sanitized = parsed.clone();
            if sanitized.password().is_some() {
                let _ = sanitized.set_password(Some("***"));
            }
            sanitized.to_string()
        } else {
            "invalid_url".to_string()
        }
    }
}
