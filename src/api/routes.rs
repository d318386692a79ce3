//! API route configuration.
//!
//! Both link endpoints are rate limited per client via
//! [`crate::api::middleware::rate_limit`].

use crate::api::handlers::{redirect_handler, shorten_handler};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Link routes, gated by the rate limiter.
///
/// # Endpoints
///
/// - `POST /url/shorten` - Create (or fetch) the short URL for a long URL
/// - `GET  /{code}`      - Redirect to the original URL
pub fn link_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/url/shorten", post(shorten_handler))
        .route("/{code}", get(redirect_handler))
        .route_layer(middleware::from_fn_with_state(state, rate_limit::layer))
}
