//! Header filtering and outbound header construction.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Drop `origin` and inject a default user-agent on outbound requests
//! - Decode the `h64` extra-header set and overlay it last
//!
//! # Design Decisions
//! - `h64` decoding is deliberately permissive: bad base64, bad JSON, or a
//!   non-object result all degrade to "no extra headers", never to an error
//! - Extra header entries win over everything inbound, including the
//!   injected default user-agent

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use base64::prelude::*;

/// Headers meaningful only for a single transport connection. An intermediary
/// must not forward these. `host` is included so the client picks the correct
/// one for the target.
pub const HOP_BY_HOP_HEADERS: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "host",
];

/// `HeaderName` is always lowercase, so a plain string compare is already
/// case-insensitive.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Decode the `h64` query parameter: base64, then JSON, then require a
/// key-value object. Any failure yields `None`.
pub fn decode_extra_headers(h64: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let decoded = BASE64_STANDARD.decode(h64).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Build the outbound header map: inbound minus hop-by-hop minus `origin`,
/// default user-agent when the client sent none, extra headers overlaid last.
pub fn build_outbound_headers(
    inbound: &HeaderMap,
    extra: Option<&serde_json::Map<String, serde_json::Value>>,
    default_user_agent: &str,
) -> HeaderMap {
    let mut outbound = HeaderMap::new();

    for (name, value) in inbound.iter() {
        if is_hop_by_hop(name) || name == &header::ORIGIN {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    if !outbound.contains_key(header::USER_AGENT) {
        if let Ok(value) = HeaderValue::from_str(default_user_agent) {
            outbound.insert(header::USER_AGENT, value);
        }
    }

    if let Some(extra) = extra {
        for (name, value) in extra {
            // Non-string values and illegal header tokens are skipped, in the
            // same permissive spirit as the h64 decode itself.
            let Some(value) = value.as_str() else {
                continue;
            };
            let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) else {
                continue;
            };
            outbound.insert(name, value);
        }
    }

    outbound
}

/// Copy upstream response headers, dropping the hop-by-hop set.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::new();
    for (name, value) in upstream.iter() {
        if is_hop_by_hop(name) {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const UA: &str = "cors-relay/test";

    fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn hop_by_hop_headers_are_stripped() {
        let mut inbound = HeaderMap::new();
        inbound.insert("connection", HeaderValue::from_static("keep-alive"));
        inbound.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        inbound.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        inbound.insert("host", HeaderValue::from_static("relay.example"));
        inbound.insert("accept", HeaderValue::from_static("application/json"));

        let outbound = build_outbound_headers(&inbound, None, UA);

        assert!(!outbound.contains_key("connection"));
        assert!(!outbound.contains_key("keep-alive"));
        assert!(!outbound.contains_key("transfer-encoding"));
        assert!(!outbound.contains_key("host"));
        assert_eq!(outbound["accept"], "application/json");
    }

    #[test]
    fn origin_is_removed_and_user_agent_injected() {
        let mut inbound = HeaderMap::new();
        inbound.insert("origin", HeaderValue::from_static("https://app.example"));

        let outbound = build_outbound_headers(&inbound, None, UA);

        assert!(!outbound.contains_key("origin"));
        assert_eq!(outbound[header::USER_AGENT], UA);
    }

    #[test]
    fn inbound_user_agent_is_preserved() {
        let mut inbound = HeaderMap::new();
        inbound.insert("user-agent", HeaderValue::from_static("curl/8.0"));

        let outbound = build_outbound_headers(&inbound, None, UA);
        assert_eq!(outbound[header::USER_AGENT], "curl/8.0");
    }

    #[test]
    fn extra_headers_override_inbound_and_default_user_agent() {
        let mut inbound = HeaderMap::new();
        inbound.insert("authorization", HeaderValue::from_static("Bearer inbound"));

        let extra = object(json!({
            "Authorization": "Bearer abc",
            "User-Agent": "custom-agent",
        }));
        let outbound = build_outbound_headers(&inbound, Some(&extra), UA);

        assert_eq!(outbound["authorization"], "Bearer abc");
        assert_eq!(outbound[header::USER_AGENT], "custom-agent");
    }

    #[test]
    fn malformed_extra_entries_are_skipped() {
        let inbound = HeaderMap::new();
        let extra = object(json!({
            "X-Number": 42,
            "Bad Header Name": "value",
            "X-Ok": "fine",
        }));
        let outbound = build_outbound_headers(&inbound, Some(&extra), UA);

        assert!(!outbound.contains_key("x-number"));
        assert_eq!(outbound["x-ok"], "fine");
        assert_eq!(outbound.len(), 2); // x-ok plus injected user-agent
    }

    #[test]
    fn decode_extra_headers_happy_path() {
        let h64 = BASE64_STANDARD.encode(r#"{"Authorization":"Bearer abc"}"#);
        let map = decode_extra_headers(&h64).unwrap();
        assert_eq!(map["Authorization"], "Bearer abc");
    }

    #[test]
    fn decode_extra_headers_failures_yield_none() {
        // Invalid base64.
        assert!(decode_extra_headers("%%%not-base64%%%").is_none());
        // Valid base64, invalid JSON.
        assert!(decode_extra_headers(&BASE64_STANDARD.encode("{not json")).is_none());
        // Valid JSON, not an object.
        assert!(decode_extra_headers(&BASE64_STANDARD.encode("[1,2,3]")).is_none());
        assert!(decode_extra_headers(&BASE64_STANDARD.encode("null")).is_none());
        assert!(decode_extra_headers(&BASE64_STANDARD.encode("\"text\"")).is_none());
    }

    #[test]
    fn response_filtering_drops_hop_by_hop() {
        let mut upstream = HeaderMap::new();
        upstream.insert("connection", HeaderValue::from_static("close"));
        upstream.insert("content-type", HeaderValue::from_static("text/plain"));
        upstream.insert("etag", HeaderValue::from_static("\"abc\""));

        let filtered = filter_response_headers(&upstream);
        assert!(!filtered.contains_key("connection"));
        assert_eq!(filtered["content-type"], "text/plain");
        assert_eq!(filtered["etag"], "\"abc\"");
    }
}
