//! HMAC signature creation and verification

use crate::utils::error::{GateError, Result};
use hmac::{Hmac, Mac, digest::KeyInit as HmacKeyInit};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Create a hex-encoded HMAC-SHA256 signature of `data` under `key`
pub fn create_hmac_signature(key: &[u8], data: &str) -> Result<String> {
    let mut mac = <HmacSha256 as HmacKeyInit>::new_from_slice(key)
        .map_err(|e| GateError::Crypto(format!("Invalid HMAC key: {}", e)))?;

    mac.update(data.as_bytes());
    let result = mac.finalize();
    Ok(hex::encode(result.into_bytes()))
}

/// Check a hex-encoded `signature` of `data` under `key` in constant time.
///
/// Anything that is not hex of the right length is a mismatch, not an error.
pub fn verify_hmac_signature(key: &[u8], data: &str, signature: &str) -> Result<bool> {
    let Ok(supplied) = hex::decode(signature) else {
        return Ok(false);
    };

    let mut mac = <HmacSha256 as HmacKeyInit>::new_from_slice(key)
        .map_err(|e| GateError::Crypto(format!("Invalid HMAC key: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.verify_slice(&supplied).is_ok())
}
