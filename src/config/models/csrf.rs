//! CSRF configuration

use super::*;
use serde::{Deserialize, Serialize};

/// CSRF protection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsrfConfig {
    /// Enable CSRF protection
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_csrf_key_prefix")]
    pub key_prefix: String,
    /// Paths whose safe requests receive a fresh token
    #[serde(default = "default_issue_paths")]
    pub issue_paths: Vec<String>,
    /// Path prefixes whose unsafe requests skip validation
    #[serde(default)]
    pub exempt_paths: Vec<String>,
    /// Delete the record once a token validates
    #[serde(default)]
    pub single_use: bool,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token_ttl_secs: default_token_ttl_secs(),
            key_prefix: default_csrf_key_prefix(),
            issue_paths: default_issue_paths(),
            exempt_paths: Vec::new(),
            single_use: false,
        }
    }
}
