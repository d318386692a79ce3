//! Fixed-window, per-client request rate limiter.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::errors::LimiterError;
use crate::infrastructure::rate_limit::CounterStore;

const KEY_PREFIX: &str = "ratelimit:";

/// What to do when the counter backend cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimiterPolicy {
    /// Fail the request with an internal error.
    #[default]
    FailClosed,
    /// Admit the request and log a warning.
    FailOpen,
}

/// Admits at most `max_requests` per client per `window`.
///
/// The first request of a window creates the counter and the store arms its
/// TTL; the window ends when the counter expires, and the next request starts
/// a fresh one.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    max_requests: u64,
    window: Duration,
    policy: LimiterPolicy,
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn CounterStore>,
        max_requests: u64,
        window: Duration,
        policy: LimiterPolicy,
    ) -> Self {
        Self {
            store,
            max_requests,
            window,
            policy,
        }
    }

    /// Counter key for a client.
    pub fn key(client: &str) -> String {
        format!("{KEY_PREFIX}{client}")
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn policy(&self) -> LimiterPolicy {
        self.policy
    }

    /// Counts a request from `client` and decides whether to admit it.
    ///
    /// # Errors
    ///
    /// Returns [`LimiterError::Unavailable`] if the counter could not be
    /// updated. Applying [`LimiterPolicy`] is left to the caller.
    pub async fn admit(&self, client: &str) -> Result<bool, LimiterError> {
        let count = self.store.incr(&Self::key(client), self.window).await?;

        let allowed = count <= self.max_requests;
        if !allowed {
            debug!(client, count, limit = self.max_requests, "Rate limit exceeded");
        }

        Ok(allowed)
    }

    /// [`Self::admit`] with the configured failure policy applied.
    ///
    /// # Errors
    ///
    /// Returns the backend error only under [`LimiterPolicy::FailClosed`].
    pub async fn admit_with_policy(&self, client: &str) -> Result<bool, LimiterError> {
        match self.admit(client).await {
            Ok(allowed) => Ok(allowed),
            Err(e) if self.policy == LimiterPolicy::FailOpen => {
                warn!(client, error = %e, "Rate limiter unavailable, admitting request");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}
