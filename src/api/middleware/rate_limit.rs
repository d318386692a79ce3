//! Per-client fixed-window rate limiting middleware.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_identity;

/// Admits or rejects a request before it reaches a handler.
///
/// # Key Extraction
///
/// Clients are identified by the socket peer address. When the service runs
/// behind a trusted reverse proxy (`BEHIND_PROXY=true`), the first
/// `X-Forwarded-For` hop or `X-Real-IP` is used instead.
///
/// # Errors
///
/// - `429 Too Many Requests` once a client exceeds its quota for the window
/// - `500 Internal Server Error` if the counter backend fails and the limiter
///   is configured to fail closed
///
/// # Example
///
/// ```rust,ignore
/// let limited = Router::new()
///     .route("/url/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_identity(req.headers(), peer, st.behind_proxy);

    if !st.rate_limiter.admit_with_policy(&client).await? {
        metrics::counter!("shortlink_rate_limited_total").increment(1);
        return Err(AppError::rate_limited(
            "Too many requests",
            json!({
                "limit": st.rate_limiter.max_requests(),
                "window_seconds": st.rate_limiter.window().as_secs(),
            }),
        ));
    }

    Ok(next.run(req).await)
}
