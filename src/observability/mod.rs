//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay handler produces:
//!     → tracing events (structured, request ID attached)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout via tracing-subscriber)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```

pub mod metrics;
