//! HTTP middleware implementations
//!
//! - `gate` - Admission gate (CSRF validation, rate limiting, token issuance)
//! - `helpers` - Token, session and client address extraction

mod gate;
mod helpers;


pub use gate::{GateMiddleware, GateMiddlewareService};
pub use helpers::{CSRF_FIELD, CSRF_HEADER, SESSION_HEADER};
