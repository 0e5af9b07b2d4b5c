//! Gate configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Admission gate configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateConfig {
    /// Take the client address from `Forwarded` / `X-Forwarded-For`
    #[serde(default)]
    pub trust_proxy_headers: bool,
    /// Cookie carrying the session identifier
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Guarded route classes, first match wins
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
    #[serde(default)]
    pub csrf: CsrfConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            trust_proxy_headers: false,
            session_cookie: default_session_cookie(),
            routes: default_routes(),
            csrf: CsrfConfig::default(),
        }
    }
}
