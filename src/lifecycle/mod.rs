//! Lifecycle coordination.
//!
//! The relay holds no per-request state across invocations; lifecycle
//! management is limited to starting the server and coordinating a graceful
//! stop across the serving task and any test harness driving it.

pub mod shutdown;

pub use shutdown::Shutdown;
