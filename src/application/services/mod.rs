//! Business logic services for the application layer.

pub mod link_cache;
pub mod link_service;
pub mod rate_limiter;

pub use link_cache::LinkCache;
pub use link_service::LinkService;
pub use rate_limiter::{LimiterPolicy, RateLimiter};
