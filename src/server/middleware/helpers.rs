//! Helper functions for middleware

use actix_web::dev::ServiceRequest;
use actix_web::http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use std::net::{IpAddr, SocketAddr};

/// Header carrying the CSRF token in both directions
pub const CSRF_HEADER: &str = "x-csrf-token";
/// Header carrying a session id when no session cookie is sent
pub const SESSION_HEADER: &str = "x-session-id";
/// Body and query field carrying the CSRF token
pub const CSRF_FIELD: &str = "_csrf";

/// Body encodings that may carry a `_csrf` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
}

/// CSRF token from the `X-CSRF-Token` header
pub fn header_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// CSRF token from the `_csrf` query parameter
pub fn query_token(query: &str) -> Option<String> {
    form_field(query.as_bytes())
}

/// CSRF token from a JSON or urlencoded body
pub fn body_token(body: &[u8], kind: BodyKind) -> Option<String> {
    match kind {
        BodyKind::Json => serde_json::from_slice::<serde_json::Value>(body)
            .ok()?
            .get(CSRF_FIELD)?
            .as_str()
            .filter(|token| !token.is_empty())
            .map(str::to_string),
        BodyKind::Form => form_field(body),
    }
}

fn form_field(raw: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(raw)
        .find(|(key, _)| key == CSRF_FIELD)
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

/// Body encoding from `Content-Type`, if it can carry a token
pub fn body_kind(headers: &HeaderMap) -> Option<BodyKind> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())?
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        Some(BodyKind::Json)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Some(BodyKind::Form)
    } else {
        None
    }
}

/// Declared body length, when present and parseable
pub fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Session id from the named cookie, else the `X-Session-ID` header
pub fn session_id(req: &ServiceRequest, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = req.cookie(cookie_name) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Client address: the socket peer, or the forwarded address when proxies are trusted.
///
/// A forwarded value that is not an IP address (with or without port) is ignored.
pub fn client_address(req: &ServiceRequest, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = req.connection_info().realip_remote_addr().and_then(parse_ip) {
            return ip.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// IP of `1.2.3.4`, `1.2.3.4:80`, `::1` or `[::1]:80`
pub(crate) fn parse_ip(addr: &str) -> Option<IpAddr> {
    let addr = addr.trim();
    addr.parse::<SocketAddr>()
        .map(|socket| socket.ip())
        .or_else(|_| addr.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>())
        .ok()
}
