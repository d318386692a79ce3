//! Validation of URLs submitted for shortening.
//!
//! URLs are stored exactly as submitted (minus surrounding whitespace), so two
//! spellings of the same address get two links. Only shape is checked here.

use url::Url;

/// Longest accepted URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a submitted URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} bytes")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Validates a URL and returns the trimmed form that is used as the store key.
///
/// # Rules
///
/// 1. Must not be empty after trimming whitespace
/// 2. At most [`MAX_URL_LENGTH`] bytes
/// 3. Must parse as an absolute URL
/// 4. Only `http` and `https` schemes
/// 5. Must have a host
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] rule violated.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_url(" https://example.com/a ").unwrap(), "https://example.com/a");
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed)
}
