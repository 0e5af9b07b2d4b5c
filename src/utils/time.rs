//! Process-wide millisecond clock

use std::sync::atomic::{AtomicU64, Ordering};

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Wall-clock milliseconds since the Unix epoch, never decreasing within this process.
///
/// Store-side scores are compared across processes, so the clock is wall time; a backwards
/// step of the system clock is absorbed by repeating the last observed value.
pub fn now_millis() -> u64 {
    let wall = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let previous = LAST_MILLIS.fetch_max(wall, Ordering::AcqRel);
    previous.max(wall)
}
