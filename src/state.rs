//! Shared application state injected into handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{LinkService, RateLimiter};

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Handles shared by every request.
///
/// Cloned per request by axum, so everything heavy sits behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Prefix joined directly to codes in `shortUrl`, used as configured.
    pub base_url: Arc<str>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` when identifying clients.
    pub behind_proxy: bool,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        rate_limiter: Arc<RateLimiter>,
        base_url: &str,
        behind_proxy: bool,
        request_timeout: Duration,
    ) -> Self {
        Self {
            link_service,
            rate_limiter,
            base_url: base_url.into(),
            behind_proxy,
            request_timeout,
        }
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}{}", self.base_url, code)
    }
}
