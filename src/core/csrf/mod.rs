//! CSRF protection
//!
//! Safe requests on token-issuing routes receive `HMAC-SHA256(secret, session_id)`; unsafe
//! requests must echo it back. Records are stored per session and expire with the token.

mod manager;
mod types;


pub use manager::CsrfManager;
pub use types::{CsrfToken, CsrfVerdict};
