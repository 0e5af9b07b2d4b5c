//! CSRF token types

use crate::utils::error::GateError;
use serde::{Deserialize, Serialize};

/// A token issued to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfToken {
    pub session_id: String,
    /// Hex HMAC-SHA256 of the session id under the session secret
    pub token: String,
    /// Expiry in milliseconds since the Unix epoch
    pub expires_at: u64,
}

/// Server-side record persisted per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CsrfRecord {
    /// Hex-encoded secret
    pub secret: String,
    pub token: String,
    pub expires_at: u64,
}

/// Outcome of checking a supplied token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfVerdict {
    Validated,
    /// No token was supplied
    Missing,
    /// No live record exists for the session
    Expired,
    /// The token does not match the session secret
    Invalid,
}

impl CsrfVerdict {
    pub fn is_valid(self) -> bool {
        matches!(self, CsrfVerdict::Validated)
    }

    /// Map a failed verdict to its rejection error
    pub fn into_result(self) -> Result<(), GateError> {
        match self {
            CsrfVerdict::Validated => Ok(()),
            CsrfVerdict::Missing => Err(GateError::CsrfTokenMissing),
            CsrfVerdict::Expired => Err(GateError::CsrfTokenExpired),
            CsrfVerdict::Invalid => Err(GateError::CsrfTokenInvalid),
        }
    }
}
