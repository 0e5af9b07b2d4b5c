//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::gate::Gate;
use crate::storage::EphemeralStore;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for sharing across worker threads.
#[derive(Clone)]
pub struct AppState {
    /// Gate configuration (shared read-only)
    pub config: Arc<Config>,
    /// Ephemeral store backing every limiter and CSRF record
    pub store: Arc<dyn EphemeralStore>,
    /// Admission gate
    pub gate: Arc<Gate>,
}

impl AppState {
    /// Build the gate on top of `store`
    pub fn new(config: Config, store: Arc<dyn EphemeralStore>) -> Self {
        let gate = Gate::from_config(config.gate(), Arc::clone(&store));
        Self {
            config: Arc::new(config),
            store,
            gate: Arc::new(gate),
        }
    }

    /// Get gate configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
