//! Core admission logic
//!
//! - `rate_limiter` - Store-backed sliding-window and backoff limiters
//! - `csrf` - Per-session CSRF token issuance and validation
//! - `gate` - Composition of both into request admission decisions

pub mod csrf;
pub mod gate;
pub mod rate_limiter;
