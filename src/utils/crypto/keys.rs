//! Secret and identifier generation

use rand::RngCore;

/// Length in bytes of generated session secrets
pub const SECRET_LEN: usize = 32;

/// Generate a fresh random secret from the OS-seeded thread RNG
pub fn generate_secret() -> [u8; SECRET_LEN] {
    let mut secret = [0u8; SECRET_LEN];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

/// Generate a unique member name for a request log entry
pub fn log_member(timestamp_ms: u64) -> String {
    format!("{}-{}", timestamp_ms, uuid::Uuid::new_v4().simple())
}
