//! Counter store trait backing the rate limiter.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::errors::LimiterError;

/// Atomic windowed counters, keyed by string.
///
/// A counter that does not exist (or has expired) counts from zero.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increments the counter at `key` and returns the new value.
    ///
    /// A counter left without an expiry is given one of `window`, whichever
    /// request observes it. A counter that already expires keeps its deadline.
    async fn incr(&self, key: &str, window: Duration) -> Result<u64, LimiterError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}
