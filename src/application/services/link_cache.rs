//! Cache-aside projection of links.
//!
//! Every link is mirrored under two key families:
//!
//! - `short_url:{original_url}` → short code
//! - `short_code:{short_code}` → original URL
//!
//! Entries are disposable copies of durable state. Cache failures are logged
//! and degrade to a miss, never to a failed request.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::entities::Link;
use crate::infrastructure::cache::CacheService;

/// Default lifetime of cache entries.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const URL_KEY_PREFIX: &str = "short_url:";
const CODE_KEY_PREFIX: &str = "short_code:";

/// Fail-open wrapper around a [`CacheService`] that knows the link key layout.
#[derive(Clone)]
pub struct LinkCache {
    cache: Arc<dyn CacheService>,
    ttl: Duration,
}

impl LinkCache {
    pub fn new(cache: Arc<dyn CacheService>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Cache key holding the code for an original URL.
    pub fn url_key(original_url: &str) -> String {
        format!("{URL_KEY_PREFIX}{original_url}")
    }

    /// Cache key holding the original URL for a code.
    pub fn code_key(short_code: &str) -> String {
        format!("{CODE_KEY_PREFIX}{short_code}")
    }

    /// Looks up the code previously issued for `original_url`.
    pub async fn code_for_url(&self, original_url: &str) -> Option<String> {
        self.lookup(&Self::url_key(original_url)).await
    }

    /// Looks up the original URL behind `short_code`.
    pub async fn url_for_code(&self, short_code: &str) -> Option<String> {
        self.lookup(&Self::code_key(short_code)).await
    }

    /// Populates both directions for a link.
    pub async fn remember(&self, link: &Link) {
        self.store(&Self::url_key(&link.original_url), &link.short_code)
            .await;
        self.store(&Self::code_key(&link.short_code), &link.original_url)
            .await;
    }

    /// Populates only the code → URL direction.
    pub async fn remember_code(&self, short_code: &str, original_url: &str) {
        self.store(&Self::code_key(short_code), original_url).await;
    }

    pub async fn health_check(&self) -> bool {
        self.cache.health_check().await
    }

    async fn lookup(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache HIT");
                metrics::counter!("shortlink_cache_hits_total").increment(1);
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache MISS");
                metrics::counter!("shortlink_cache_misses_total").increment(1);
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, falling back to store");
                metrics::counter!("shortlink_cache_errors_total").increment(1);
                None
            }
        }
    }

    async fn store(&self, key: &str, value: &str) {
        if let Err(e) = self.cache.set(key, value, self.ttl).await {
            warn!(key, error = %e, "Cache write failed");
            metrics::counter!("shortlink_cache_errors_total").increment(1);
        }
    }
}
