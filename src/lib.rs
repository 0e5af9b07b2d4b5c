//! # admission-gate
//!
//! Request-admission gate for sensitive HTTP endpoints such as login, registration and
//! password reset.
//!
//! ## Features
//!
//! - **Sliding-window limiting**: a fixed number of events per trailing window and client
//! - **Exponential backoff**: windows double and quotas halve with each repeated violation
//! - **CSRF protection**: per-session HMAC tokens for state-changing requests
//! - **Pluggable storage**: Redis or an in-process store, every call bounded by a timeout
//! - **Fail-open**: store faults are logged and the request is admitted
//!
//! ## Embedding the gate
//!
//! ```rust,no_run
//! use admission_gate::{Config, Gate, GateRequest};
//! use admission_gate::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let gate = Gate::from_config(config.gate(), Arc::new(MemoryStore::new()));
//!
//!     let request = GateRequest::new("GET", "/api/csrf-token", "203.0.113.7").with_session("s1");
//!     let admission = gate.admit(&request).await?;
//!     println!("token: {:?}", admission.csrf_token.map(|t| t.token));
//!     Ok(())
//! }
//! ```
//!
//! ## Standalone server
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     admission_gate::server::run_server("config/gate.yaml").await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::csrf::{CsrfManager, CsrfToken, CsrfVerdict};
pub use core::gate::{Admission, Gate, GateRequest};
pub use core::rate_limiter::{BackoffLimiter, Limiter, RateLimitResult, SlidingWindowLimiter};
pub use storage::EphemeralStore;
pub use utils::error::{GateError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
