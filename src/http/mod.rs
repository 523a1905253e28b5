//! HTTP relay subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, middleware layers)
//!     → handler.rs (preflight, target validation, forwarding)
//!     → headers.rs (hop-by-hop filtering, h64 overlay)
//!     → upstream client (reqwest, streaming both directions)
//!     → cors.rs (cross-origin header set on the way out)
//!     → Send to client
//! ```

pub mod cors;
pub mod error;
pub mod handler;
pub mod headers;
pub mod request_id;
pub mod server;

pub use request_id::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
