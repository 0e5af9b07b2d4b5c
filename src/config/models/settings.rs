//! Top-level gate settings

#![allow(missing_docs)]

use super::*;
use crate::utils::error::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Everything the `gate` binary is configured with
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GateSettings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Admission gate configuration
    #[serde(default)]
    pub gate: GateConfig,
}

impl GateSettings {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_vars(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by the variables `lookup` resolves
    pub fn from_env_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        settings.apply_env(lookup)?;
        Ok(settings)
    }

    /// Apply `GATE_*` overrides on top of the current values
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GATE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_var(&lookup, "GATE_PORT")? {
            self.server.port = port;
        }
        if let Some(url) = lookup("GATE_REDIS_URL") {
            self.storage.redis.url = url;
            self.storage.redis.enabled = true;
        }
        if let Some(timeout) = parse_var(&lookup, "GATE_STORE_TIMEOUT_MS")? {
            self.storage.operation_timeout_ms = timeout;
        }
        if let Some(trust) = parse_var(&lookup, "GATE_TRUST_PROXY")? {
            self.gate.trust_proxy_headers = trust;
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GateError::Config(format!("Invalid value for {}: {}", name, e))),
    }
}
