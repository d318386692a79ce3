//! Classification of PostgreSQL unique violations.

use crate::domain::errors::RepositoryError;

/// Unique constraint on `links.short_code`.
pub const CODE_CONSTRAINT: &str = "links_short_code_key";

/// Unique constraint on `links.original_url`.
pub const URL_CONSTRAINT: &str = "links_original_url_key";

/// Maps a unique violation on one of the link constraints to its conflict kind.
///
/// Returns `None` for every other error, including unique violations on
/// constraints this crate does not know about.
pub fn classify(e: &sqlx::Error) -> Option<RepositoryError> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    classify_constraint(db_err.constraint())
}

pub(crate) fn classify_constraint(constraint: Option<&str>) -> Option<RepositoryError> {
    match constraint {
        Some(CODE_CONSTRAINT) => Some(RepositoryError::CodeConflict),
        Some(URL_CONSTRAINT) => Some(RepositoryError::UrlConflict),
        _ => None,
    }
}
