//! Per-request deadline middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Bounds the whole request, including every store and cache call, by the
/// configured deadline.
///
/// On expiry the inner future is dropped and the client receives a generic
/// `500 Internal Server Error`.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    tokio::time::timeout(st.request_timeout, next.run(req))
        .await
        .map_err(|_| {
            AppError::internal(
                "Request deadline exceeded",
                json!({
                    "method": method.as_str(),
                    "path": path,
                    "timeout_ms": st.request_timeout.as_millis() as u64,
                }),
            )
        })
}
