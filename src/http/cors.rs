//! Cross-origin permission headers.
//!
//! Every response leaving the relay, success or failure, carries this set so
//! browser clients can read it. The allow-origin value echoes the inbound
//! `Origin` header when present and falls back to `*`. Credentials are never
//! allowed: a wildcard origin is never combined with credentialed requests.

use axum::http::{header, HeaderMap, HeaderValue};

pub const ALLOW_METHODS: &str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";
pub const ALLOW_HEADERS: &str =
    "Content-Type, Authorization, X-Requested-With, X-CSRF-Token, Accept, Origin";
pub const MAX_AGE_SECS: &str = "86400";
pub const DEFAULT_EXPOSE_HEADERS: &str = "Content-Type, Content-Length, ETag";

/// Insert the fixed cross-origin header set, overwriting any same-named
/// headers already present.
pub fn apply_cors_headers(headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
    let allow_origin = origin
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("false"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE_SECS),
    );
}

/// Default `Access-Control-Expose-Headers` unless upstream already set one.
pub fn ensure_expose_headers(headers: &mut HeaderMap) {
    if !headers.contains_key(header::ACCESS_CONTROL_EXPOSE_HEADERS) {
        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(DEFAULT_EXPOSE_HEADERS),
        );
    }
}
