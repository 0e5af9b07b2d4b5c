//! Validators for the configuration sections

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for GateSettings {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gate settings");

        self.server.validate()?;
        self.storage.validate()?;
        self.gate.validate()?;

        debug!("Gate settings validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Worker count seems too high (>1000)".to_string());
            }
        }

        if self.max_body_size == 0 {
            return Err("Max body size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.operation_timeout_ms == 0 {
            return Err("Store operation timeout must be greater than 0".to_string());
        }

        if self.redis.enabled {
            if self.redis.url.is_empty() {
                return Err("Redis URL is required when Redis is enabled".to_string());
            }
            if !self.redis.url.starts_with("redis://") && !self.redis.url.starts_with("rediss://")
            {
                return Err("Redis URL must start with redis:// or rediss://".to_string());
            }
            if self.redis.connection_timeout == 0 {
                return Err("Redis connection timeout must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for GateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.session_cookie.is_empty() {
            return Err("Session cookie name cannot be empty".to_string());
        }

        let mut names = HashSet::new();
        for route in &self.routes {
            route.validate()?;
            if !names.insert(route.name.as_str()) {
                return Err(format!("Duplicate route name: {}", route.name));
            }
        }

        self.csrf.validate()?;

        if self.csrf.enabled
            && self
                .routes
                .iter()
                .any(|route| route.limiter.key_prefix() == self.csrf.key_prefix)
        {
            return Err(format!(
                "CSRF key prefix '{}' collides with a limiter key prefix",
                self.csrf.key_prefix
            ));
        }

        Ok(())
    }
}

impl Validate for RouteConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Route name cannot be empty".to_string());
        }
        if self.name.contains(':') {
            return Err(format!("Route name '{}' cannot contain ':'", self.name));
        }
        if !self.path.starts_with('/') {
            return Err(format!("Route '{}' path must start with '/'", self.name));
        }
        for method in &self.methods {
            if method.is_empty() || !method.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(format!(
                    "Route '{}' has an invalid method: {:?}",
                    self.name, method
                ));
            }
        }

        self.limiter
            .validate()
            .map_err(|e| format!("Route '{}': {}", self.name, e))
    }
}

impl Validate for LimiterConfig {
    fn validate(&self) -> Result<(), String> {
        match self {
            LimiterConfig::SlidingWindow(c) => c.validate(),
            LimiterConfig::Backoff(c) => c.validate(),
        }
    }
}

impl Validate for SlidingWindowConfig {
    fn validate(&self) -> Result<(), String> {
        if self.window_ms == 0 {
            return Err("window_ms must be greater than 0".to_string());
        }
        if self.max_requests == 0 {
            return Err("max_requests must be greater than 0".to_string());
        }
        if self.key_prefix.is_empty() {
            return Err("key_prefix cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for BackoffConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_window_ms == 0 {
            return Err("base_window_ms must be greater than 0".to_string());
        }
        if self.max_window_ms < self.base_window_ms {
            return Err("max_window_ms cannot be smaller than base_window_ms".to_string());
        }
        if self.base_quota == 0 {
            return Err("base_quota must be greater than 0".to_string());
        }
        if self.key_prefix.is_empty() {
            return Err("key_prefix cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for CsrfConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.token_ttl_secs == 0 {
            return Err("CSRF token TTL must be greater than 0".to_string());
        }
        if self.key_prefix.is_empty() {
            return Err("CSRF key prefix cannot be empty".to_string());
        }
        for path in self.issue_paths.iter().chain(&self.exempt_paths) {
            if !path.starts_with('/') {
                return Err(format!("CSRF path '{}' must start with '/'", path));
            }
        }
        Ok(())
    }
}
