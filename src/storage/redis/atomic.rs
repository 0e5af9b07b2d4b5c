//! Redis atomic operations
//!
//! Counter increments run as a `MULTI` transaction; the window pipeline runs as a Lua script
//! so trim, count, conditional insert and expiry execute as one unit on the server.

use super::pool::RedisStore;
use super::ttl_millis;
use crate::storage::{WindowPipeline, WindowSnapshot};
use crate::utils::error::{GateError, Result};
use redis::Script;
use std::sync::LazyLock;
use std::time::Duration;

/// KEYS[1] = log; ARGV = trim_up_to, limit, score, member, ttl_ms.
/// Returns `{count, inserted, oldest_score}` with `-1` for an empty log.
const WINDOW_LUA: &str = r"
redis.call('ZREMRANGEBYSCORE', KEYS[1], '-inf', ARGV[1])
local count = redis.call('ZCARD', KEYS[1])
local inserted = 0
if count < tonumber(ARGV[2]) then
  redis.call('ZADD', KEYS[1], ARGV[3], ARGV[4])
  redis.call('PEXPIRE', KEYS[1], ARGV[5])
  inserted = 1
end
local oldest = redis.call('ZRANGE', KEYS[1], 0, 0, 'WITHSCORES')
local oldest_score = -1
if oldest[2] then
  oldest_score = tonumber(oldest[2])
end
return {count, inserted, oldest_score}
";

static WINDOW_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(WINDOW_LUA));

impl RedisStore {
    /// `INCR` and `PEXPIRE` in one transaction, returning the new value
    pub(crate) async fn increment_with_expiry(&self, key: &str, ttl: Duration) -> Result<i64> {
        let mut conn = self.connection()?;
        let (value,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .pexpire(key, ttl_millis(ttl))
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Run the window pipeline against the sorted set at `key`
    pub(crate) async fn run_window_script(
        &self,
        key: &str,
        pipeline: &WindowPipeline,
    ) -> Result<WindowSnapshot> {
        let mut conn = self.connection()?;
        let (count, inserted, oldest): (i64, i64, i64) = WINDOW_SCRIPT
            .key(key)
            .arg(pipeline.trim_up_to)
            .arg(pipeline.limit)
            .arg(pipeline.score)
            .arg(&pipeline.member)
            .arg(ttl_millis(pipeline.ttl))
            .invoke_async(&mut conn)
            .await?;

        snapshot_from_reply(count, inserted, oldest)
    }
}

/// Decode the script reply
pub(crate) fn snapshot_from_reply(count: i64, inserted: i64, oldest: i64) -> Result<WindowSnapshot> {
    let count = u32::try_from(count)
        .map_err(|_| GateError::store(format!("unexpected log cardinality {count}")))?;
    Ok(WindowSnapshot {
        count,
        inserted: inserted == 1,
        oldest_score: u64::try_from(oldest).ok(),
    })
}
