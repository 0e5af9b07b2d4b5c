//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Sliding-window limiter parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlidingWindowConfig {
    /// Trailing window in milliseconds
    pub window_ms: u64,
    /// Events admitted per window
    pub max_requests: u32,
    #[serde(default = "default_sliding_prefix")]
    pub key_prefix: String,
}

/// Exponential-backoff limiter parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Window with no recorded violations, in milliseconds
    pub base_window_ms: u64,
    /// Window ceiling; also the lifetime of the violation counter
    pub max_window_ms: u64,
    /// Events admitted per window with no recorded violations
    pub base_quota: u32,
    #[serde(default = "default_backoff_prefix")]
    pub key_prefix: String,
}

/// Limiter strategy for a route class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum LimiterConfig {
    SlidingWindow(SlidingWindowConfig),
    Backoff(BackoffConfig),
}

impl LimiterConfig {
    /// Strategy name as written in configuration
    pub fn strategy(&self) -> &'static str {
        match self {
            LimiterConfig::SlidingWindow(_) => "sliding_window",
            LimiterConfig::Backoff(_) => "backoff",
        }
    }

    pub fn key_prefix(&self) -> &str {
        match self {
            LimiterConfig::SlidingWindow(c) => &c.key_prefix,
            LimiterConfig::Backoff(c) => &c.key_prefix,
        }
    }
}

/// A class of guarded routes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Stable identifier, part of every limiter key for this class
    pub name: String,
    /// Path prefix matched against the request path
    pub path: String,
    /// Methods guarded on this path; empty guards every method
    #[serde(default)]
    pub methods: Vec<String>,
    pub limiter: LimiterConfig,
}

impl RouteConfig {
    /// Whether a request with `method` and `path` belongs to this class
    pub fn matches(&self, method: &str, path: &str) -> bool {
        let path_matches = match path.strip_prefix(self.path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.path.ends_with('/'),
            None => false,
        };
        path_matches
            && (self.methods.is_empty()
                || self.methods.iter().any(|m| m.eq_ignore_ascii_case(method)))
    }
}

/// Route classes shipped by default: login, registration and password reset
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            name: "login".to_string(),
            path: "/auth/login".to_string(),
            methods: vec!["POST".to_string()],
            limiter: LimiterConfig::SlidingWindow(SlidingWindowConfig {
                window_ms: 15 * 60 * 1000,
                max_requests: 5,
                key_prefix: default_sliding_prefix(),
            }),
        },
        RouteConfig {
            name: "register".to_string(),
            path: "/auth/register".to_string(),
            methods: vec!["POST".to_string()],
            limiter: LimiterConfig::SlidingWindow(SlidingWindowConfig {
                window_ms: 60 * 60 * 1000,
                max_requests: 3,
                key_prefix: default_sliding_prefix(),
            }),
        },
        RouteConfig {
            name: "forgot-password".to_string(),
            path: "/auth/forgot-password".to_string(),
            methods: vec!["POST".to_string()],
            limiter: LimiterConfig::Backoff(BackoffConfig {
                base_window_ms: 60 * 60 * 1000,
                max_window_ms: 24 * 60 * 60 * 1000,
                base_quota: 3,
                key_prefix: default_backoff_prefix(),
            }),
        },
    ]
}
