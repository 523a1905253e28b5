//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: RELAY_*)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the HTTP server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults so an empty config (or none at all) is valid
//! - The allow-list is normalized to lowercase at load time so request-path
//!   matching is a plain set lookup

pub mod loader;
pub mod schema;

pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::RelayConfig;
pub use schema::RelayPolicyConfig;
pub use schema::UpstreamConfig;
