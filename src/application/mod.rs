//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! cache lookups, and code generation. Services consume repository and gateway
//! traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution
//! - [`services::link_cache::LinkCache`] - Two-way cache-aside projection of links
//! - [`services::rate_limiter::RateLimiter`] - Fixed-window per-client admission

pub mod services;
