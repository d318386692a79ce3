//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates (or returns the existing) short URL for a long URL.
///
/// # Endpoint
///
/// `POST /url/shorten`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/a" }
/// ```
///
/// # Response
///
/// ```json
/// { "shortUrl": "http://localhost:8080/Xy3_a9" }
/// ```
///
/// Submitting the same URL again yields the same `shortUrl`.
///
/// # Errors
///
/// - `400 Bad Request` for a missing, malformed or empty body, or an invalid URL
/// - `500 Internal Server Error` if a code cannot be issued or the store fails
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let code = state.link_service.shorten(&payload.original_url).await?;

    Ok(Json(ShortenResponse {
        short_url: state.short_url(&code),
    }))
}
