//! Cryptographic utilities
//!
//! HMAC signing for CSRF tokens and random secret generation.

pub mod hmac;
pub mod keys;

pub use self::hmac::{create_hmac_signature, verify_hmac_signature};
pub use self::keys::{SECRET_LEN, generate_secret, log_member};
