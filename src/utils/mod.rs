//! Shared utilities: errors, crypto helpers and the process clock

pub mod crypto;
pub mod error;
pub mod time;
