//! Process-local counter store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::store::CounterStore;
use crate::domain::errors::LimiterError;

/// Map size above which expired counters are swept on increment.
const PURGE_THRESHOLD: usize = 10_000;

#[derive(Debug, Default, Clone, Copy)]
struct Counter {
    count: u64,
    expires_at: Option<Instant>,
}

impl Counter {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-memory counter store with the same expiry semantics as Redis.
///
/// Counters live only in this process, so limits are per instance. Used
/// when Redis is not configured and in tests.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: DashMap<String, Counter>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_expired(&self) {
        self.counters.retain(|_, counter| !counter.is_expired());
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn incr(&self, key: &str, window: Duration) -> Result<u64, LimiterError> {
        if self.counters.len() > PURGE_THRESHOLD {
            self.purge_expired();
        }

        let mut counter = self.counters.entry(key.to_string()).or_default();
        if counter.is_expired() {
            *counter = Counter::default();
        }
        counter.count += 1;
        if counter.expires_at.is_none() {
            counter.expires_at = Some(Instant::now() + window);
        }

        Ok(counter.count)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
