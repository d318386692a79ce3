//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, Redis setup, service wiring, and the Axum
//! server lifecycle.

use crate::application::services::{LinkCache, LinkService, RateLimiter};
use crate::config::Config;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::infrastructure::rate_limit::{CounterStore, InMemoryCounterStore, RedisCounterStore};
use crate::infrastructure::redis_pool;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache and rate limit counters (or in-process fallbacks)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations applied");

    let (cache, counters) = connect_redis(&config).await;

    let link_repository: Arc<dyn LinkRepository> =
        Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let generator: Arc<dyn CodeGenerator> = Arc::new(RandomCodeGenerator);
    let link_service = Arc::new(LinkService::new(
        link_repository,
        generator,
        LinkCache::new(cache, config.cache_ttl()),
        config.code_max_attempts,
    ));
    let rate_limiter = Arc::new(RateLimiter::new(
        counters,
        config.rate_limit_max_requests,
        config.rate_limit_window(),
        config.limiter_policy(),
    ));

    let state = AppState::new(
        link_service,
        rate_limiter,
        &config.endpoint,
        config.behind_proxy,
        config.request_timeout(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Builds the cache and counter backends.
///
/// Both share one Redis connection manager. Without Redis, or if it is
/// unreachable at startup, caching is disabled and rate limit counters are
/// kept per process.
async fn connect_redis(config: &Config) -> (Arc<dyn CacheService>, Arc<dyn CounterStore>) {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Redis not configured: cache disabled, in-memory rate limit counters");
        return fallback_backends();
    };

    match redis_pool::connect(redis_url).await {
        Ok(manager) => {
            tracing::info!("Cache and rate limit counters enabled (Redis)");
            let cache: Arc<dyn CacheService> = Arc::new(RedisCache::new(manager.clone()));
            let counters: Arc<dyn CounterStore> = Arc::new(RedisCounterStore::new(manager));
            (cache, counters)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis: {}. Using NullCache and in-memory counters.",
                e
            );
            fallback_backends()
        }
    }
}

fn fallback_backends() -> (Arc<dyn CacheService>, Arc<dyn CounterStore>) {
    let cache: Arc<dyn CacheService> = Arc::new(NullCache::new());
    let counters: Arc<dyn CounterStore> = Arc::new(InMemoryCounterStore::new());
    (cache, counters)
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}
