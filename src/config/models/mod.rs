//! Configuration data models
//!
//! This module defines all configuration structures used by the gate.

#![allow(missing_docs)]

pub mod csrf;
pub mod gate;
pub mod rate_limit;
pub mod server;
pub mod settings;
pub mod storage;

// Re-export all configuration types
pub use csrf::*;
pub use gate::*;
pub use rate_limit::*;
pub use server::*;
pub use settings::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    256 * 1024 // 256KB
}

pub fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

/// Default Redis connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

/// Default bound on a single store call in milliseconds
pub fn default_operation_timeout_ms() -> u64 {
    500
}

pub fn default_session_cookie() -> String {
    "session".to_string()
}

pub fn default_true() -> bool {
    true
}

/// Default CSRF token lifetime in seconds
pub fn default_token_ttl_secs() -> u64 {
    3600 // 1 hour
}

pub fn default_csrf_key_prefix() -> String {
    "csrf".to_string()
}

pub fn default_issue_paths() -> Vec<String> {
    vec!["/api/csrf-token".to_string()]
}

pub fn default_sliding_prefix() -> String {
    "ratelimit".to_string()
}

pub fn default_backoff_prefix() -> String {
    "backoff".to_string()
}
