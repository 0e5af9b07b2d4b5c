//! CSRF token manager

use super::types::{CsrfRecord, CsrfToken, CsrfVerdict};
use crate::config::CsrfConfig;
use crate::storage::EphemeralStore;
use crate::utils::crypto::{create_hmac_signature, generate_secret, verify_hmac_signature};
use crate::utils::error::{GateError, Result};
use crate::utils::time::now_millis;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Issues per-session tokens bound to a server-side secret and validates them
pub struct CsrfManager {
    config: CsrfConfig,
    store: Arc<dyn EphemeralStore>,
}

impl CsrfManager {
    pub fn new(config: CsrfConfig, store: Arc<dyn EphemeralStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.config.token_ttl_secs)
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}:{}", self.config.key_prefix, session_id)
    }

    /// Generate a fresh secret for `session_id`, replacing any earlier record
    pub async fn issue(&self, session_id: &str) -> Result<CsrfToken> {
        let secret = generate_secret();
        let token = create_hmac_signature(&secret, session_id)?;
        let ttl = self.token_ttl();
        let expires_at = now_millis().saturating_add(self.config.token_ttl_secs.saturating_mul(1000));

        let record = CsrfRecord {
            secret: hex::encode(secret),
            token: token.clone(),
            expires_at,
        };
        self.store
            .set(&self.key(session_id), &serde_json::to_string(&record)?, ttl)
            .await?;

        debug!(session_id, expires_at, "Issued CSRF token");
        Ok(CsrfToken {
            session_id: session_id.to_string(),
            token,
            expires_at,
        })
    }

    /// Check `supplied` against the session record, propagating store faults
    pub async fn verify(&self, session_id: &str, supplied: Option<&str>) -> Result<CsrfVerdict> {
        let Some(supplied) = supplied.filter(|token| !token.is_empty()) else {
            return Ok(CsrfVerdict::Missing);
        };

        let key = self.key(session_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(CsrfVerdict::Expired);
        };
        let record: CsrfRecord = serde_json::from_str(&raw)?;

        if record.expires_at <= now_millis() {
            self.store.delete(&key).await?;
            return Ok(CsrfVerdict::Expired);
        }

        // the stored token is never trusted; the HMAC is recomputed from the secret
        let secret = hex::decode(&record.secret)
            .map_err(|e| GateError::store(format!("corrupt CSRF secret at {key:?}: {e}")))?;
        if !verify_hmac_signature(&secret, session_id, supplied)? {
            return Ok(CsrfVerdict::Invalid);
        }

        if self.config.single_use {
            self.store.delete(&key).await?;
        }
        Ok(CsrfVerdict::Validated)
    }

    /// Admit or reject an unsafe request.
    ///
    /// Store faults admit the request and are logged.
    pub async fn validate(&self, session_id: &str, supplied: Option<&str>) -> Result<()> {
        match self.verify(session_id, supplied).await {
            Ok(verdict) => {
                if !verdict.is_valid() {
                    warn!(session_id, ?verdict, "CSRF validation failed");
                }
                verdict.into_result()
            }
            Err(e) if e.is_store_fault() => {
                warn!(error = %e, session_id, "CSRF store fault, admitting request");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the session's record so its token stops validating
    pub async fn revoke(&self, session_id: &str) -> Result<()> {
        self.store.delete(&self.key(session_id)).await
    }
}
