//! The relay handler.
//!
//! # Responsibilities
//! - Short-circuit OPTIONS preflights with the cross-origin header set
//! - Validate the `url` query parameter against scheme and allow-list
//! - Decode the optional `h64` extra-header set (permissively)
//! - Forward method, filtered headers, and streamed body to the target
//! - Stream the upstream response back with cross-origin headers attached
//!
//! # Design Decisions
//! - Bodies are never materialized: the inbound body streams to the target
//!   and the upstream body streams to the caller, with backpressure
//! - No retries anywhere; a failed upstream call is a structured 502
//! - If the upstream body errors after the status is committed, the client
//!   connection is aborted rather than patched over

use std::time::Instant;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::Response;
use url::Url;

use crate::config::RelayPolicyConfig;
use crate::http::cors;
use crate::http::error::{error_response, RelayError};
use crate::http::headers::{build_outbound_headers, decode_extra_headers, filter_response_headers};
use crate::http::request_id::X_REQUEST_ID;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Query parameters recognized by the relay.
struct RelayParams {
    url: Option<String>,
    h64: Option<String>,
}

/// Main relay handler, registered for every method on every path.
pub async fn relay_handler(State(state): State<AppState>, request: Request) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().clone();
    let origin = request.headers().get(header::ORIGIN).cloned();

    // 1. Preflight short-circuit.
    if method == Method::OPTIONS {
        metrics::record_request(method.as_str(), StatusCode::NO_CONTENT.as_u16(), start_time);
        return preflight_response(origin.as_ref());
    }

    let params = parse_query(request.uri().query().unwrap_or(""));

    // 2. Target validation.
    let target = match validate_target(params.url, &state.config.relay) {
        Ok(target) => target,
        Err(error) => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                error = %error,
                "Rejected relay request"
            );
            metrics::record_request(method.as_str(), error.status().as_u16(), start_time);
            return error_response(&error, origin.as_ref());
        }
    };

    // 3. Extra header decoding. Failure is swallowed; the set is just absent.
    let extra_headers = params.h64.as_deref().and_then(|h64| {
        let decoded = decode_extra_headers(h64);
        if decoded.is_none() {
            tracing::debug!(request_id = %request_id, "Ignoring undecodable h64 parameter");
        }
        decoded
    });

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        target = %target,
        extra_headers = extra_headers.as_ref().map(|m| m.len()).unwrap_or(0),
        "Relaying request"
    );

    // 4. Outbound header construction.
    let (parts, body) = request.into_parts();
    let mut outbound_headers = build_outbound_headers(
        &parts.headers,
        extra_headers.as_ref(),
        &state.config.relay.user_agent,
    );

    // 5. Body attachment. GET and HEAD never carry a body upstream; all
    // other methods stream the inbound body through unbuffered. When the
    // body is dropped, an inbound content-length must not leak with it.
    let send_body = method != Method::GET && method != Method::HEAD;
    if !send_body {
        outbound_headers.remove(header::CONTENT_LENGTH);
    }

    let mut upstream_request = state
        .client
        .request(method.clone(), target)
        .headers(outbound_headers);

    if send_body {
        upstream_request = upstream_request.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    // 6. Upstream execution.
    let upstream_response = match upstream_request.send().await {
        Ok(response) => response,
        Err(source) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                error = %source,
                "Upstream request failed"
            );
            let error = RelayError::Upstream(source);
            metrics::record_request(method.as_str(), error.status().as_u16(), start_time);
            return error_response(&error, origin.as_ref());
        }
    };

    // 7. Response relay.
    let status = upstream_response.status();
    let mut response_headers = filter_response_headers(upstream_response.headers());
    cors::apply_cors_headers(&mut response_headers, origin.as_ref());
    cors::ensure_expose_headers(&mut response_headers);

    metrics::record_request(method.as_str(), status.as_u16(), start_time);
    tracing::debug!(
        request_id = %request_id,
        status = %status,
        "Relaying upstream response"
    );

    // A mid-stream upstream error surfaces as a body error, which aborts the
    // client connection; the committed status cannot be rewritten.
    let mut response = Response::new(Body::from_stream(upstream_response.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    response
}

fn preflight_response(origin: Option<&HeaderValue>) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    cors::apply_cors_headers(response.headers_mut(), origin);
    response
}

fn parse_query(query: &str) -> RelayParams {
    let mut params = RelayParams {
        url: None,
        h64: None,
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "url" if params.url.is_none() => params.url = Some(value.into_owned()),
            "h64" if params.h64.is_none() => params.h64 = Some(value.into_owned()),
            _ => {}
        }
    }
    params
}

/// Resolve the `url` parameter into a permitted absolute http(s) target.
fn validate_target(raw: Option<String>, policy: &RelayPolicyConfig) -> Result<Url, RelayError> {
    let raw = raw.ok_or(RelayError::MissingTarget)?;

    let target = Url::parse(&raw).map_err(|_| RelayError::InvalidTarget(raw.clone()))?;
    if !matches!(target.scheme(), "http" | "https") {
        return Err(RelayError::InvalidTarget(raw));
    }

    let host = target.host_str().unwrap_or_default();
    if !policy.host_allowed(host) {
        return Err(RelayError::HostNotAllowed(host.to_string()));
    }

    Ok(target)
}
