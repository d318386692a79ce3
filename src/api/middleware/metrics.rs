//! Per-request HTTP metrics.
//!
//! Records through the `metrics` facade; nothing is exported unless the
//! binary installs a recorder.

use axum::{
    body::HttpBody,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Endpoint label for requests that matched no route.
const UNMATCHED: &str = "unmatched";

/// Records `request_total`, `request_duration_seconds`, `request_size_bytes`
/// and `response_size_bytes`, each labelled by method, route template and
/// status.
///
/// Must be added with [`axum::Router::layer`] so that [`MatchedPath`] is
/// available; label cardinality stays bounded by the route table.
pub async fn layer(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED.to_owned());
    let request_size = body_size(req.body());

    let response = next.run(req).await;

    let labels = [
        ("method", method),
        ("endpoint", endpoint),
        ("status", response.status().as_u16().to_string()),
    ];

    metrics::counter!("request_total", &labels).increment(1);
    metrics::histogram!("request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
    metrics::histogram!("request_size_bytes", &labels).record(request_size);
    metrics::histogram!("response_size_bytes", &labels).record(body_size(response.body()));

    response
}

/// Exact body length when known up front, else the lower bound.
fn body_size(body: &impl HttpBody) -> f64 {
    let hint = body.size_hint();
    hint.exact().unwrap_or(hint.lower()) as f64
}
