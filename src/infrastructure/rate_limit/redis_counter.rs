//! Redis-backed counter store.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::time::Duration;

use super::store::CounterStore;
use crate::domain::errors::LimiterError;

/// Counter store using `INCR`, `TTL` and `EXPIRE`.
///
/// Counters are shared by every instance pointed at the same Redis, so the
/// limit holds across a horizontally scaled deployment.
pub struct RedisCounterStore {
    client: ConnectionManager,
}

impl RedisCounterStore {
    pub fn new(client: ConnectionManager) -> Self {
        Self { client }
    }
}

/// `TTL` reply for a key that exists but never expires.
const TTL_PERSISTENT: i64 = -1;

/// Whether a counter with the given `TTL` reply still needs its window armed.
fn needs_window(ttl: i64) -> bool {
    ttl == TTL_PERSISTENT
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr(&self, key: &str, window: Duration) -> Result<u64, LimiterError> {
        let mut conn = self.client.clone();

        let (count, ttl): (u64, i64) = redis::pipe()
            .atomic()
            .incr(key, 1u64)
            .ttl(key)
            .query_async(&mut conn)
            .await?;

        // Any counter found without a TTL is armed, not only a fresh one: an
        // earlier EXPIRE may have failed or been cancelled after its INCR.
        if needs_window(ttl) {
            redis::cmd("EXPIRE")
                .arg(key)
                .arg(window.as_secs().max(1))
                .query_async::<()>(&mut conn)
                .await?;
        }

        Ok(count)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
