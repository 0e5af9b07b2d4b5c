//! Error handling for the admission gate
//!
//! This module defines the crate-wide error type and its HTTP mapping.

mod helpers;
mod response;
mod types;

pub use response::{CSRF_INVALID_LABEL, CSRF_MISSING_LABEL};
pub use types::{GateError, Result};
