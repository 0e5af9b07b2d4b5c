//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::server::middleware::GateMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::{self, EphemeralStore};
use crate::utils::error::{GateError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::DefaultHeaders,
    web,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server, connecting the configured store
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let store = storage::connect(config.storage()).await?;
        Ok(Self::with_store(config.clone(), store))
    }

    /// Create a server on top of an already connected store
    pub fn with_store(config: Config, store: Arc<dyn EphemeralStore>) -> Self {
        Self {
            config: config.server().clone(),
            state: AppState::new(config, store),
        }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let gate_config = state.config.gate().clone();
        let max_body_size = state.config.server().max_body_size;
        let gate = Arc::clone(&state.gate);

        App::new()
            .app_data(state)
            .app_data(web::PayloadConfig::new(max_body_size))
            .configure(|cfg| routes::configure_routes(cfg, &gate_config.routes))
            .wrap(GateMiddleware::new(gate, &gate_config, max_body_size))
            .wrap(DefaultHeaders::new().add(("Server", "admission-gate")))
            .wrap(TracingLogger::default())
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();

        info!("Starting HTTP server on {}", bind_addr);

        let store = Arc::clone(&self.state.store);
        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| GateError::Config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        let outcome = server
            .await
            .map_err(|e| GateError::Internal(format!("Server error: {}", e)));

        if let Err(e) = store.close().await {
            warn!(error = %e, "Failed to close store cleanly");
        }

        info!("HTTP server stopped");
        outcome
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
