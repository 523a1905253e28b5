//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method and status
//! - `relay_request_duration_seconds` (histogram): latency distribution

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one terminal request outcome.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "relay_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}
