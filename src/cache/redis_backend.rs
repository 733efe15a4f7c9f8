//! Redis Cache Backend
//!
//! Shared cache for multi-instance deployments. Pattern deletion walks the
//! keyspace with `SCAN MATCH` so it never blocks the server the way `KEYS` does.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::cache::CacheBackend;
use crate::error::CacheResult;

/// Keys fetched per `SCAN` round trip.
const SCAN_BATCH: usize = 200;

/// Cache backend talking to a Redis server.
pub struct RedisCacheBackend {
    client: redis::Client,
}

impl RedisCacheBackend {
    /// Builds a client for `url`. No connection is made until the first call,
    /// so an unreachable server degrades reads instead of blocking startup.
    pub fn open(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn conn(&self) -> CacheResult<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.conn().await?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn delete_by_pattern(&self, pattern: &str) -> CacheResult<usize> {
        let mut conn = self.conn().await?;
        let mut cursor: u64 = 0;
        let mut removed = 0usize;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let deleted: usize = conn.del(&keys).await?;
                removed += deleted;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern, removed, "redis pattern delete");
        Ok(removed)
    }

    async fn ping(&self) -> CacheResult<bool> {
        let mut conn = self.conn().await?;
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(reply == "PONG")
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
