//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1`
/// 2. **Cache**: Redis `PING` (always ok when caching is disabled)
/// 3. **Rate limiter**: counter backend `PING`
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "Reachable" },
///     "rate_limiter": { "status": "ok", "message": "Reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (database, cache, rate_limiter) = tokio::join!(
        state.link_service.store_healthy(),
        state.link_service.cache_healthy(),
        state.rate_limiter.health_check(),
    );

    let checks = HealthChecks {
        database: check(database, "Connected", "Database unreachable"),
        cache: check(cache, "Reachable", "Cache unreachable"),
        rate_limiter: check(rate_limiter, "Reachable", "Counter store unreachable"),
    };

    let all_healthy = checks.database.is_ok() && checks.cache.is_ok() && checks.rate_limiter.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        tracing::warn!("Health check degraded");
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn check(healthy: bool, ok: &str, error: &str) -> CheckStatus {
    if healthy {
        CheckStatus::ok(ok)
    } else {
        CheckStatus::error(error)
    }
}
