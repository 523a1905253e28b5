//! CORS Forwarding Relay Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
