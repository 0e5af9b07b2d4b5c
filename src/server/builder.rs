//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function for automatic configuration loading.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GateError, Result};
use std::path::Path;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GateError::Config("Configuration is required".to_string()))?;
        config.validate()?;

        HttpServer::new(&config).await
    }
}

/// Load configuration from `config_path` and serve until shutdown
pub async fn run_server(config_path: impl AsRef<Path>) -> Result<()> {
    let config_path = config_path.as_ref();
    info!("Starting admission gate");
    info!("Loading configuration file: {}", config_path.display());

    let config = Config::load(config_path).await?;
    let server = ServerBuilder::new().with_config(config).build().await?;

    info!("Server starting at: http://{}", server.config().address());
    for route in &server.state().config.gate().routes {
        info!(
            "   {} {} - {} ({})",
            route.methods.join("|"),
            route.path,
            route.name,
            route.limiter.strategy()
        );
    }

    server.start().await
}
