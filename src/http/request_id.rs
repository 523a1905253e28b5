//! Request correlation IDs.
//!
//! A UUID v4 is attached as `x-request-id` when the client did not supply
//! one, flows through logging and upstream forwarding, and is echoed on the
//! response.

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub async fn propagate_request_id(mut request: Request, next: Next) -> Response {
    let id = match request.headers().get(&X_REQUEST_ID) {
        Some(existing) => existing.clone(),
        None => {
            // A UUID is always a valid header value.
            let generated = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            request
                .headers_mut()
                .insert(X_REQUEST_ID, generated.clone());
            generated
        }
    };

    let mut response = next.run(request).await;
    response.headers_mut().entry(X_REQUEST_ID).or_insert(id);
    response
}
