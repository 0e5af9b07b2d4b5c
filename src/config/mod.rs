//! Configuration management for the gate
//!
//! This module handles loading, validation, and management of all gate configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{GateError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gate
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gate settings
    pub settings: GateSettings,
}

impl Config {
    /// Load configuration from a YAML file, then apply `GATE_*` environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GateError::Config(format!("Failed to read config file: {}", e)))?;

        let mut settings: GateSettings = serde_yaml::from_str(&content)
            .map_err(|e| GateError::Config(format!("Failed to parse config: {}", e)))?;
        settings.apply_env(|name| std::env::var(name).ok())?;

        let config = Self { settings };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let settings = GateSettings::from_env()?;
        let config = Self { settings };

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise from the environment
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await
        } else {
            info!(
                "Config file {:?} not found, using environment and defaults",
                path
            );
            Self::from_env()
        }
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.settings.server
    }

    /// Get storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.settings.storage
    }

    /// Get gate configuration
    pub fn gate(&self) -> &GateConfig {
        &self.settings.gate
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.settings
            .server
            .validate()
            .map_err(|e| GateError::Config(format!("Server config error: {}", e)))?;

        self.settings
            .storage
            .validate()
            .map_err(|e| GateError::Config(format!("Storage config error: {}", e)))?;

        self.settings
            .gate
            .validate()
            .map_err(|e| GateError::Config(format!("Gate config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.settings)
            .map_err(|e| GateError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.settings)
            .map_err(|e| GateError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
