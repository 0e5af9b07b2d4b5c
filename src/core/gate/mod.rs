//! Request admission
//!
//! The [`Gate`] composes CSRF validation and the per-route limiters into one decision per
//! request. It knows nothing about HTTP frameworks; the server middleware translates
//! requests into [`GateRequest`] values and rejections into responses.


use crate::config::{CsrfConfig, GateConfig, RouteConfig};
use crate::core::csrf::{CsrfManager, CsrfToken};
use crate::core::rate_limiter::{Limiter, RateLimitResult, build_limiter};
use crate::storage::EphemeralStore;
use crate::utils::error::{GateError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Methods that never mutate state and never require a CSRF token
const SAFE_METHODS: [&str; 4] = ["GET", "HEAD", "OPTIONS", "TRACE"];

pub fn is_safe_method(method: &str) -> bool {
    SAFE_METHODS.iter().any(|m| m.eq_ignore_ascii_case(method))
}

/// The parts of an inbound request the gate decides on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateRequest {
    pub method: String,
    pub path: String,
    pub client_addr: String,
    pub session_id: Option<String>,
    /// CSRF token from the header, body or query
    pub supplied_token: Option<String>,
}

impl GateRequest {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        client_addr: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            client_addr: client_addr.into(),
            session_id: None,
            supplied_token: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.supplied_token = Some(token.into());
        self
    }

    /// Key CSRF records are bound to: the session id, else the client address
    pub fn session_key(&self) -> &str {
        self.session_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.client_addr)
    }
}

/// What an admitted request carries forward
#[derive(Debug, Clone, Default)]
pub struct Admission {
    /// Token issued on a safe request to a token-issuing path
    pub csrf_token: Option<CsrfToken>,
    /// Limiter outcome on guarded routes
    pub rate_limit: Option<RateLimitResult>,
}

/// A route class with its limiter
pub struct GuardedRoute {
    pub config: RouteConfig,
    pub limiter: Arc<dyn Limiter>,
}

/// Active limiter state per route class
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteStatus {
    pub name: String,
    pub strategy: String,
    pub key_prefix: String,
    pub active_keys: usize,
}

pub struct Gate {
    routes: Vec<GuardedRoute>,
    csrf: Option<CsrfManager>,
}

impl Gate {
    /// Build every limiter and the CSRF manager on top of `store`
    pub fn from_config(config: &GateConfig, store: Arc<dyn EphemeralStore>) -> Self {
        let routes: Vec<GuardedRoute> = config
            .routes
            .iter()
            .map(|route| GuardedRoute {
                config: route.clone(),
                limiter: build_limiter(&route.limiter, Arc::clone(&store)),
            })
            .collect();

        let csrf = config
            .csrf
            .enabled
            .then(|| CsrfManager::new(config.csrf.clone(), Arc::clone(&store)));

        info!(
            routes = routes.len(),
            csrf = csrf.is_some(),
            backend = store.backend(),
            "Admission gate configured"
        );
        Self { routes, csrf }
    }

    pub fn routes(&self) -> &[GuardedRoute] {
        &self.routes
    }

    pub fn csrf(&self) -> Option<&CsrfManager> {
        self.csrf.as_ref()
    }

    fn csrf_config(&self) -> Option<&CsrfConfig> {
        self.csrf.as_ref().map(CsrfManager::config)
    }

    /// First route class matching the request
    pub fn route_for(&self, method: &str, path: &str) -> Option<&GuardedRoute> {
        self.routes
            .iter()
            .find(|route| route.config.matches(method, path))
    }

    /// Whether the request must present a valid CSRF token
    pub fn requires_csrf(&self, method: &str, path: &str) -> bool {
        match self.csrf_config() {
            Some(config) => {
                !is_safe_method(method)
                    && !config
                        .exempt_paths
                        .iter()
                        .any(|exempt| path.starts_with(exempt.as_str()))
            }
            None => false,
        }
    }

    /// Whether an admitted request receives a fresh CSRF token
    pub fn issues_token(&self, method: &str, path: &str) -> bool {
        match self.csrf_config() {
            Some(config) => is_safe_method(method) && config.issue_paths.iter().any(|p| p == path),
            None => false,
        }
    }

    /// Decide a request: CSRF first, then the route's limiter, then token issuance
    pub async fn admit(&self, request: &GateRequest) -> Result<Admission> {
        let mut admission = Admission::default();

        if let Some(csrf) = &self.csrf {
            if self.requires_csrf(&request.method, &request.path) {
                csrf.validate(request.session_key(), request.supplied_token.as_deref())
                    .await?;
            }
        }

        if let Some(route) = self.route_for(&request.method, &request.path) {
            let subject = format!("{}:{}", route.config.name, request.client_addr);
            let result = route.limiter.check(&subject).await;
            if !result.allowed {
                let rejection = result.rejection.ok_or_else(|| {
                    GateError::internal("limiter rejected without rejection details")
                })?;
                return Err(GateError::RateLimitExceeded(rejection));
            }
            admission.rate_limit = Some(result);
        }

        if let Some(csrf) = &self.csrf {
            if self.issues_token(&request.method, &request.path) {
                match csrf.issue(request.session_key()).await {
                    Ok(token) => admission.csrf_token = Some(token),
                    Err(e) => warn!(error = %e, path = %request.path, "Failed to issue CSRF token"),
                }
            }
        }

        debug!(method = %request.method, path = %request.path, "Request admitted");
        Ok(admission)
    }

    /// Clear limiter state of `client_addr` on the named route; false when no such route
    pub async fn reset(&self, route_name: &str, client_addr: &str) -> Result<bool> {
        let Some(route) = self.routes.iter().find(|r| r.config.name == route_name) else {
            return Ok(false);
        };
        route
            .limiter
            .reset(&format!("{}:{}", route.config.name, client_addr))
            .await?;
        info!(route = route_name, client_addr, "Limiter state reset");
        Ok(true)
    }

    /// Active request-log counts per route class
    pub async fn status(&self) -> Result<Vec<RouteStatus>> {
        let mut statuses = Vec::with_capacity(self.routes.len());
        for route in &self.routes {
            let keys = route
                .limiter
                .active_keys(&format!("{}:", route.config.name))
                .await?;
            statuses.push(RouteStatus {
                name: route.config.name.clone(),
                strategy: route.limiter.strategy().to_string(),
                key_prefix: route.limiter.key_prefix().to_string(),
                active_keys: keys.len(),
            });
        }
        Ok(statuses)
    }
}
