//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Link, NewLink};
use crate::domain::errors::RepositoryError;
use crate::domain::repositories::LinkRepository;

/// Process-local link store enforcing the same two uniqueness constraints as
/// the `links` table.
///
/// Links are keyed by short code; a secondary index maps original URLs to
/// codes. Two writers racing on the same URL see exactly one winner, and the
/// loser's conflict is only reported once the winner's link is readable, as
/// with a unique index in PostgreSQL.
#[derive(Debug)]
pub struct InMemoryLinkRepository {
    by_code: DashMap<String, Link>,
    code_by_url: DashMap<String, String>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            by_code: DashMap::new(),
            code_by_url: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<Link>, RepositoryError> {
        let Some(code) = self.code_by_url.get(original_url).map(|c| c.clone()) else {
            return Ok(None);
        };

        Ok(self.by_code.get(&code).map(|l| l.clone()))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, RepositoryError> {
        Ok(self.by_code.get(short_code).map(|l| l.clone()))
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, RepositoryError> {
        // Lock order is always URL index, then code map. The URL slot stays
        // locked until the link row is in place.
        let Entry::Vacant(url_slot) = self.code_by_url.entry(new_link.original_url.clone()) else {
            return Err(RepositoryError::UrlConflict);
        };

        let Entry::Vacant(code_slot) = self.by_code.entry(new_link.short_code.clone()) else {
            return Err(RepositoryError::CodeConflict);
        };

        let link = Link::new(
            self.next_id.fetch_add(1, Ordering::Relaxed),
            new_link.original_url,
            new_link.short_code,
            Utc::now(),
        );
        code_slot.insert(link.clone());
        url_slot.insert(link.short_code.clone());

        Ok(link)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
