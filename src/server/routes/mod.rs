//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod gate;
pub mod health;

use crate::config::RouteConfig;
use actix_web::web;

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Register every gate endpoint and a placeholder for each guarded route class
pub fn configure_routes(cfg: &mut web::ServiceConfig, routes: &[RouteConfig]) {
    health::configure_routes(cfg);
    gate::configure_routes(cfg);

    for route in routes {
        cfg.route(&route.path, web::route().to(gate::guarded_placeholder));
    }
}
