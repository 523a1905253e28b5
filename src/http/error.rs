//! Relay error taxonomy and JSON error responses.
//!
//! Validation failures short-circuit before any upstream call; upstream
//! failures become a structured 502. Errors after the response has started
//! streaming cannot be converted and simply terminate the connection.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde_json::json;
use thiserror::Error;

use crate::http::cors;

/// User-visible relay failures.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing required query parameter: url")]
    MissingTarget,

    #[error("Invalid target URL (must be absolute http or https): {0}")]
    InvalidTarget(String),

    #[error("Target host is not allowed: {0}")]
    HostNotAllowed(String),

    #[error("Upstream error")]
    Upstream(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingTarget | RelayError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            RelayError::HostNotAllowed(_) => StatusCode::FORBIDDEN,
            RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            RelayError::Upstream(source) => json!({
                "error": "Upstream error",
                "detail": source.to_string(),
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

/// Build the JSON error response. Cross-origin headers are attached so a
/// browser client can read the error body instead of seeing only a CORS
/// failure masking it.
pub fn error_response(error: &RelayError, origin: Option<&HeaderValue>) -> Response {
    let mut response = Response::new(Body::from(error.body().to_string()));
    *response.status_mut() = error.status();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    cors::apply_cors_headers(response.headers_mut(), origin);
    response
}
