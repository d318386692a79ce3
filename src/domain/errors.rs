//! Typed failures reported by the gateways.

use thiserror::Error;

/// Failure of a persistence gateway operation.
///
/// The two conflict variants are expected outcomes of concurrent writers and
/// drive retries in the shorten workflow. Only [`RepositoryError::Unavailable`]
/// is a real failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("short code is already taken")]
    CodeConflict,

    #[error("original url is already shortened")]
    UrlConflict,

    #[error("{0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        crate::utils::db_error::classify(&e)
            .unwrap_or_else(|| RepositoryError::Unavailable(e.to_string()))
    }
}

/// Failure of the rate limiter's counter backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LimiterError {
    #[error("{0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for LimiterError {
    fn from(e: redis::RedisError) -> Self {
        LimiterError::Unavailable(e.to_string())
    }
}
