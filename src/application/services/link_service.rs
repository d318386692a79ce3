//! Link creation and resolution service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::application::services::LinkCache;
use crate::domain::entities::NewLink;
use crate::domain::errors::RepositoryError;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_reserved, is_well_formed};
use crate::utils::url_validator::validate_url;

/// Default ceiling on generate-check-insert attempts per shorten call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Issues short codes for URLs and resolves codes back to URLs.
///
/// Reads go cache first, then store; every store read or write refreshes the
/// cache. The store's unique constraints are the only coordination between
/// concurrent callers: no in-process locks are taken.
pub struct LinkService<L: ?Sized = dyn LinkRepository, G: ?Sized = dyn CodeGenerator> {
    link_repository: Arc<L>,
    generator: Arc<G>,
    cache: LinkCache,
    max_attempts: u32,
}

impl<L, G> LinkService<L, G>
where
    L: LinkRepository + ?Sized,
    G: CodeGenerator + ?Sized,
{
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<L>,
        generator: Arc<G>,
        cache: LinkCache,
        max_attempts: u32,
    ) -> Self {
        Self {
            link_repository,
            generator,
            cache,
            max_attempts,
        }
    }

    /// Returns the short code for `original_url`, creating a link on first use.
    ///
    /// Repeated calls with the same URL return the same code, including when
    /// they race each other.
    ///
    /// # Flow
    ///
    /// 1. Validate the URL (no I/O on failure)
    /// 2. Cache lookup by URL
    /// 3. Store lookup by URL; an existing link repopulates the cache
    /// 4. Generate a code, skip it if reserved or taken, then insert
    /// 5. On a code conflict, try another code; on a URL conflict, another
    ///    writer won and its code is returned
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty or malformed URL
    /// - [`AppError::Generation`] if the random source fails
    /// - [`AppError::CodeSpaceExhausted`] after `max_attempts` unusable codes
    /// - [`AppError::StoreUnavailable`] on database errors
    pub async fn shorten(&self, original_url: &str) -> Result<String, AppError> {
        let original_url = validate_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if let Some(code) = self.cache.code_for_url(original_url).await {
            return Ok(code);
        }

        if let Some(existing) = self
            .link_repository
            .find_by_original_url(original_url)
            .await?
        {
            self.cache.remember(&existing).await;
            return Ok(existing.short_code);
        }

        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate()?;

            if is_reserved(&code) || self.link_repository.find_by_code(&code).await?.is_some() {
                debug!(attempt, code, "Short code collision");
                metrics::counter!("shortlink_code_collisions_total").increment(1);
                continue;
            }

            match self
                .link_repository
                .insert(NewLink::new(code.as_str(), original_url))
                .await
            {
                Ok(link) => {
                    info!(code = %link.short_code, url = %link.original_url, "Link created");
                    metrics::counter!("shortlink_links_created_total").increment(1);
                    self.cache.remember(&link).await;
                    return Ok(link.short_code);
                }
                Err(RepositoryError::CodeConflict) => {
                    debug!(attempt, code, "Short code taken by concurrent writer");
                    metrics::counter!("shortlink_code_collisions_total").increment(1);
                }
                Err(RepositoryError::UrlConflict) => {
                    info!(url = %original_url, "URL shortened by concurrent writer");
                    return self.existing_code(original_url).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::code_space_exhausted(
            "Failed to generate unique code",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Returns the original URL behind `short_code`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link has this code
    /// - [`AppError::StoreUnavailable`] on database errors
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        if !is_well_formed(short_code) {
            return Err(not_found(short_code));
        }

        if let Some(url) = self.cache.url_for_code(short_code).await {
            return Ok(url);
        }

        let link = self
            .link_repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| not_found(short_code))?;

        self.cache
            .remember_code(&link.short_code, &link.original_url)
            .await;

        Ok(link.original_url)
    }

    pub async fn store_healthy(&self) -> bool {
        self.link_repository.health_check().await
    }

    pub async fn cache_healthy(&self) -> bool {
        self.cache.health_check().await
    }

    /// Reads back the link a concurrent writer created for `original_url`.
    async fn existing_code(&self, original_url: &str) -> Result<String, AppError> {
        let link = self
            .link_repository
            .find_by_original_url(original_url)
            .await?
            .ok_or_else(|| {
                AppError::store_unavailable(
                    "Link missing after URL conflict",
                    json!({ "url": original_url }),
                )
            })?;

        self.cache.remember(&link).await;
        Ok(link.short_code)
    }
}

fn not_found(short_code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": short_code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::link_cache::DEFAULT_CACHE_TTL;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, MemoryCache, MockCacheService, NullCache};
    use crate::utils::code_generator::{GenerationError, MockCodeGenerator};
    use chrono::Utc;
    use mockall::Sequence;
    use mockall::predicate::eq;

    const URL: &str = "https://example.com/a";

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, url.to_string(), code.to_string(), Utc::now())
    }

    fn null_cache() -> LinkCache {
        LinkCache::new(Arc::new(NullCache::new()), DEFAULT_CACHE_TTL)
    }

    fn generator_yielding(codes: &[&'static str]) -> MockCodeGenerator {
        let mut generator = MockCodeGenerator::new();
        let mut seq = Sequence::new();
        for &code in codes {
            generator
                .expect_generate()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move || Ok(code.to_string()));
        }
        generator
    }

    fn service(
        repo: MockLinkRepository,
        generator: MockCodeGenerator,
        cache: LinkCache,
    ) -> LinkService<MockLinkRepository, MockCodeGenerator> {
        LinkService::new(Arc::new(repo), Arc::new(generator), cache, 3)
    }

    #[tokio::test]
    async fn test_shorten_creates_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url()
            .with(eq(URL))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_code()
            .with(eq("abc123"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new_link| new_link.short_code == "abc123" && new_link.original_url == URL)
            .times(1)
            .returning(|_| Ok(create_test_link(1, "abc123", URL)));

        let cache = Arc::new(MemoryCache::new());
        let service = service(
            repo,
            generator_yielding(&["abc123"]),
            LinkCache::new(cache.clone(), DEFAULT_CACHE_TTL),
        );

        assert_eq!(service.shorten(URL).await.unwrap(), "abc123");
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_shorten_cache_hit_skips_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().times(0);
        repo.expect_insert().times(0);

        let cache = Arc::new(MemoryCache::new());
        let link_cache = LinkCache::new(cache, DEFAULT_CACHE_TTL);
        link_cache.remember(&create_test_link(1, "cached", URL)).await;

        let service = service(repo, MockCodeGenerator::new(), link_cache);

        assert_eq!(service.shorten(URL).await.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_shorten_existing_link_is_idempotent() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(Some(create_test_link(5, "exists", URL))));
        repo.expect_insert().times(0);

        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().times(0);

        let cache = Arc::new(MemoryCache::new());
        let link_cache = LinkCache::new(cache, DEFAULT_CACHE_TTL);
        let service = service(repo, generator, link_cache.clone());

        assert_eq!(service.shorten(URL).await.unwrap(), "exists");
        // The cold cache is repaired in both directions.
        assert_eq!(link_cache.code_for_url(URL).await.as_deref(), Some("exists"));
        assert_eq!(link_cache.url_for_code("exists").await.as_deref(), Some(URL));
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_url_without_io() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().times(0);

        let mut cache = MockCacheService::new();
        cache.expect_get().times(0);

        let service = service(
            repo,
            MockCodeGenerator::new(),
            LinkCache::new(Arc::new(cache), DEFAULT_CACHE_TTL),
        );

        for input in ["", "   ", "not-a-url", "javascript:alert(1)"] {
            let err = service.shorten(input).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{input:?}");
        }
    }

    #[tokio::test]
    async fn test_shorten_retries_on_occupied_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_find_by_code()
            .with(eq("taken1"))
            .times(1)
            .returning(|_| Ok(Some(create_test_link(9, "taken1", "https://other.com"))));
        repo.expect_find_by_code()
            .with(eq("free01"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new_link| new_link.short_code == "free01")
            .times(1)
            .returning(|_| Ok(create_test_link(10, "free01", URL)));

        let service = service(repo, generator_yielding(&["taken1", "free01"]), null_cache());

        assert_eq!(service.shorten(URL).await.unwrap(), "free01");
    }

    #[tokio::test]
    async fn test_shorten_skips_reserved_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_find_by_code()
            .with(eq("health"))
            .times(0);
        repo.expect_find_by_code()
            .with(eq("abc123"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Ok(create_test_link(1, "abc123", URL)));

        let service = service(repo, generator_yielding(&["health", "abc123"]), null_cache());

        assert_eq!(service.shorten(URL).await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_shorten_retries_on_code_conflict() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_find_by_code().returning(|_| Ok(None));

        let mut seq = Sequence::new();
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(RepositoryError::CodeConflict));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(create_test_link(2, "second", URL)));

        let service = service(repo, generator_yielding(&["first1", "second"]), null_cache());

        assert_eq!(service.shorten(URL).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_shorten_url_conflict_returns_winner() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();
        repo.expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(RepositoryError::UrlConflict));
        repo.expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(create_test_link(7, "winner", URL))));

        let cache = Arc::new(MemoryCache::new());
        let service = service(
            repo,
            generator_yielding(&["loser1"]),
            LinkCache::new(cache.clone(), DEFAULT_CACHE_TTL),
        );

        assert_eq!(service.shorten(URL).await.unwrap(), "winner");
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_shorten_code_space_exhausted() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_find_by_code()
            .times(3)
            .returning(|code| Ok(Some(create_test_link(1, code, "https://other.com"))));
        repo.expect_insert().times(0);

        let service = service(
            repo,
            generator_yielding(&["aaaaaa", "bbbbbb", "cccccc"]),
            null_cache(),
        );

        let err = service.shorten(URL).await.unwrap_err();
        assert!(matches!(err, AppError::CodeSpaceExhausted { .. }));
    }

    #[tokio::test]
    async fn test_shorten_generation_failure() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_insert().times(0);

        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|| Err(GenerationError::RandomSource("entropy".to_string())));

        let service = service(repo, generator, null_cache());

        let err = service.shorten(URL).await.unwrap_err();
        assert!(matches!(err, AppError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_store_failure_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(RepositoryError::Unavailable("connection reset".to_string())));

        let service = service(repo, generator_yielding(&["abc123"]), null_cache());

        let err = service.shorten(URL).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_shorten_survives_cache_outage() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_original_url()
            .returning(|_| Ok(Some(create_test_link(5, "exists", URL))));

        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .returning(|_| Err(CacheError::Connection("refused".to_string())));
        cache
            .expect_set()
            .returning(|_, _, _| Err(CacheError::Connection("refused".to_string())));

        let service = service(
            repo,
            MockCodeGenerator::new(),
            LinkCache::new(Arc::new(cache), DEFAULT_CACHE_TTL),
        );

        assert_eq!(service.shorten(URL).await.unwrap(), "exists");
    }

    #[tokio::test]
    async fn test_resolve_cache_hit() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);

        let link_cache = LinkCache::new(Arc::new(MemoryCache::new()), DEFAULT_CACHE_TTL);
        link_cache.remember_code("abc123", URL).await;

        let service = service(repo, MockCodeGenerator::new(), link_cache);

        assert_eq!(service.resolve("abc123").await.unwrap(), URL);
    }

    #[tokio::test]
    async fn test_resolve_cache_miss_populates_code_direction() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .with(eq("abc123"))
            .times(1)
            .returning(|_| Ok(Some(create_test_link(1, "abc123", URL))));

        let cache = Arc::new(MemoryCache::new());
        let link_cache = LinkCache::new(cache.clone(), DEFAULT_CACHE_TTL);
        let service = service(repo, MockCodeGenerator::new(), link_cache.clone());

        assert_eq!(service.resolve("abc123").await.unwrap(), URL);
        assert_eq!(link_cache.url_for_code("abc123").await.as_deref(), Some(URL));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let service = service(repo, MockCodeGenerator::new(), null_cache());

        let err = service.resolve("ZZZZZZ").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_io() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);

        let service = service(repo, MockCodeGenerator::new(), null_cache());

        for code in ["abc", "abc1234567", "abc$12"] {
            let err = service.resolve(code).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound { .. }), "{code}");
        }
    }

    #[tokio::test]
    async fn test_resolve_store_failure() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));

        let service = service(repo, MockCodeGenerator::new(), null_cache());

        let err = service.resolve("abc123").await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }
}
