//! Client identity extraction for rate limiting.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Identity used when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolves the identity a request is rate limited under.
///
/// When `behind_proxy` is set, the first address in `X-Forwarded-For` wins,
/// then `X-Real-IP`. Otherwise, or when those headers are absent or
/// malformed, the socket peer address is used. Headers are never trusted when
/// the service is exposed directly, since clients could rotate them freely.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(client_identity(&headers, None, true), "203.0.113.7");
/// assert_eq!(client_identity(&headers, None, false), "unknown");
/// ```
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(ip) = forwarded_for(headers) {
            return ip;
        }
        if let Some(ip) = real_ip(headers) {
            return ip;
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    parse_ip(first)
}

fn real_ip(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("x-real-ip")?.to_str().ok()?;
    parse_ip(value.trim())
}

fn parse_ip(value: &str) -> Option<String> {
    value
        .parse::<std::net::IpAddr>()
        .ok()
        .map(|ip| ip.to_string())
}
