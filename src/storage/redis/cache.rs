//! Plain Redis key operations

use super::pool::RedisStore;
use super::ttl_millis;
use crate::utils::error::Result;
use redis::AsyncCommands;
use std::time::Duration;

/// Keys requested per `SCAN` round trip
const SCAN_BATCH: usize = 500;

impl RedisStore {
    /// Get a value
    pub(crate) async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection()?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// Set a value with a millisecond expiry
    pub(crate) async fn set_value(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection()?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Delete a key
    pub(crate) async fn delete_key(&self, key: &str) -> Result<()> {
        let mut conn = self.connection()?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    /// Collect every key matching `pattern` with an incremental `SCAN`
    pub(crate) async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.connection()?;
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}
