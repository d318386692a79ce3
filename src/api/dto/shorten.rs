//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
///
/// URL syntax is checked by the shorten workflow; the DTO only rejects an
/// absent or empty field so the error points at the body shape.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The URL to shorten (absolute `http`/`https`).
    #[validate(length(min = 1, message = "originalUrl must not be empty"))]
    pub original_url: String,
}

/// Response carrying the full short URL.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"originalUrl":"https://example.com/a"}"#).unwrap();
        assert_eq!(req.original_url, "https://example.com/a");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_url_fails_validation() {
        let req: ShortenRequest = serde_json::from_str(r#"{"originalUrl":""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        assert!(serde_json::from_str::<ShortenRequest>(r#"{"url":"https://a.com"}"#).is_err());
    }

    #[test]
    fn test_response_shape() {
        let body = serde_json::to_value(ShortenResponse {
            short_url: "http://localhost:8080/abc123".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "shortUrl": "http://localhost:8080/abc123" }));
    }
}
