//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::domain::errors::RepositoryError;
use async_trait::async_trait;

/// Persistence gateway for links.
///
/// The store enforces two uniqueness constraints, one on the original URL and
/// one on the short code. `insert` reports which of them rejected the write so
/// callers can coordinate concurrent writers without locks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds the link created for an original URL.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Unavailable`] on database errors.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<Link>, RepositoryError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Unavailable`] on database errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, RepositoryError>;

    /// Inserts a new link.
    ///
    /// The insert is a single statement: it either fully succeeds or leaves no
    /// trace.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::CodeConflict`] if the short code is already taken
    /// - [`RepositoryError::UrlConflict`] if the URL already has a link
    /// - [`RepositoryError::Unavailable`] on any other database error
    async fn insert(&self, new_link: NewLink) -> Result<Link, RepositoryError>;

    /// Checks that the store is reachable.
    async fn health_check(&self) -> bool;
}
