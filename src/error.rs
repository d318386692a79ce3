//! Application error type and its HTTP mapping.
//!
//! Internal kinds are kept distinct for logging, but the wire contract only
//! exposes four outcomes: `400`, `404`, `429` and `500`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::errors::{LimiterError, RepositoryError};
use crate::utils::code_generator::GenerationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    RateLimited { message: String, details: Value },

    #[error("code generation failed: {message}")]
    Generation { message: String, details: Value },

    #[error("code space exhausted: {message}")]
    CodeSpaceExhausted { message: String, details: Value },

    #[error("store unavailable: {message}")]
    StoreUnavailable { message: String, details: Value },

    #[error("rate limiter unavailable: {message}")]
    LimiterUnavailable { message: String, details: Value },

    #[error("internal error: {message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn rate_limited(message: impl Into<String>, details: Value) -> Self {
        Self::RateLimited {
            message: message.into(),
            details,
        }
    }

    pub fn code_space_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CodeSpaceExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Short machine-readable name of the internal error kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_failure",
            Self::NotFound { .. } => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::Generation { .. } => "generation_failure",
            Self::CodeSpaceExhausted { .. } => "code_space_exhausted",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::LimiterUnavailable { .. } => "limiter_unavailable",
            Self::Internal { .. } => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the client-facing payload.
    ///
    /// Server-side failures collapse into a single generic `internal_error`.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            Self::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            Self::RateLimited { message, details } => ErrorInfo {
                code: "rate_limited",
                message: message.clone(),
                details: details.clone(),
            },
            _ => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Unavailable(reason) => {
                AppError::store_unavailable("Database error", json!({ "reason": reason }))
            }
            // Conflicts are consumed by the shorten workflow; reaching this arm means
            // one escaped, which is a bug rather than a client error.
            conflict @ (RepositoryError::CodeConflict | RepositoryError::UrlConflict) => {
                AppError::internal(
                    "Unhandled constraint conflict",
                    json!({ "reason": conflict.to_string() }),
                )
            }
        }
    }
}

impl From<LimiterError> for AppError {
    fn from(e: LimiterError) -> Self {
        AppError::LimiterUnavailable {
            message: "Rate limiter backend error".to_string(),
            details: json!({ "reason": e.to_string() }),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::Generation {
            message: "Failed to generate short code".to_string(),
            details: json!({ "reason": e.to_string() }),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Invalid request", json!({ "fields": e.to_string() }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request("Invalid request body", json!({ "reason": e.body_text() }))
    }
}
