//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /url/shorten` - Shorten a URL (rate limited)
//! - `GET  /{code}`      - Short link redirect (rate limited)
//! - `GET  /health`      - Health check: DB, cache, counter store
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Metrics** - Request count, latency and sizes per route template
//! - **Deadline** - Per-request timeout covering all backend calls
//! - **Rate limiting** - Per-client fixed window (link routes only)

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{deadline, metrics, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
///
/// The router expects `ConnectInfo<SocketAddr>` to be provided by the server
/// for per-client limiting; without it every client shares one quota.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(api::routes::link_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state.clone(), deadline::layer))
        .layer(middleware::from_fn(metrics::layer))
        .with_state(state)
        .layer(tracing::layer())
}
