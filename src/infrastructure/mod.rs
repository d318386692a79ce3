//! Infrastructure layer for external integrations.
//!
//! This layer implements the gateway interfaces, providing concrete
//! implementations for data persistence, caching and rate-limit counters.
//!
//! # Modules
//!
//! - [`cache`] - Cache gateway (Redis, in-memory and no-op implementations)
//! - [`persistence`] - Link repository implementations
//! - [`rate_limit`] - Counter stores for the rate limiter
//! - [`redis_pool`] - Shared Redis connection setup

pub mod cache;
pub mod persistence;
pub mod rate_limit;
pub mod redis_pool;
