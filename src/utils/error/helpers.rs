//! Helper functions for creating and classifying errors

use super::types::GateError;

impl GateError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store(message.into())
    }

    pub fn store_unavailable<S: Into<String>>(message: S) -> Self {
        Self::StoreUnavailable(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error originates in the store layer.
    ///
    /// Limiters and the CSRF manager absorb these faults and admit the request.
    pub fn is_store_fault(&self) -> bool {
        match self {
            Self::StoreUnavailable(_)
            | Self::Store(_)
            | Self::Timeout(_)
            | Self::Serialization(_) => true,
            #[cfg(feature = "redis")]
            Self::Redis(_) => true,
            _ => false,
        }
    }

    /// Whether this error is a terminal admission rejection for the request
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded(_)
                | Self::CsrfTokenMissing
                | Self::CsrfTokenInvalid
                | Self::CsrfTokenExpired
        )
    }
}
