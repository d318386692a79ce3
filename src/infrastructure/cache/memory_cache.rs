//! Process-local cache implementation with per-entry expiry.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Map size above which expired entries are swept on write.
const PURGE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache backed by a sharded concurrent map.
///
/// Expired entries are dropped when read, and swept on write once the map
/// grows past a threshold. Live entries are never evicted for capacity, so
/// this is meant for tests and single-node development.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    purge_threshold: usize,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_purge_threshold(PURGE_THRESHOLD)
    }
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache that sweeps expired entries on writes once it
    /// holds more than `purge_threshold` entries.
    pub fn with_purge_threshold(purge_threshold: usize) -> Self {
        Self {
            entries: DashMap::new(),
            purge_threshold,
        }
    }

    fn purge_expired(&self) {
        self.entries.retain(|_, entry| !entry.is_expired());
    }

    /// Removes every entry, simulating a cold or flushed cache.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries currently stored, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };

        if entry.is_expired() {
            drop(entry);
            self.entries.remove_if(key, |_, e| e.is_expired());
            return Ok(None);
        }

        Ok(Some(entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        if self.entries.len() > self.purge_threshold {
            self.purge_expired();
        }

        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
