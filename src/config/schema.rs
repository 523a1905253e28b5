//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Forwarding policy (allow-list, default user-agent).
    pub relay: RelayPolicyConfig,

    /// Upstream HTTP client settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Forwarding policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayPolicyConfig {
    /// Permitted target hostnames. `None` means every host is allowed.
    /// Matching is exact and case-insensitive; entries are stored lowercase.
    pub allowed_hosts: Option<Vec<String>>,

    /// User-agent injected on outbound requests when the inbound request
    /// carries none.
    pub user_agent: String,
}

impl Default for RelayPolicyConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: None,
            user_agent: format!("cors-relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RelayPolicyConfig {
    /// Lowercase all allow-list entries and drop empty ones.
    pub fn normalize(&mut self) {
        if let Some(hosts) = &mut self.allowed_hosts {
            hosts.retain(|h| !h.trim().is_empty());
            for host in hosts.iter_mut() {
                *host = host.trim().to_ascii_lowercase();
            }
            if hosts.is_empty() {
                self.allowed_hosts = None;
            }
        }
    }

    /// Check a target hostname against the allow-list.
    pub fn host_allowed(&self, host: &str) -> bool {
        match &self.allowed_hosts {
            None => true,
            Some(hosts) => {
                let host = host.to_ascii_lowercase();
                hosts.iter().any(|allowed| *allowed == host)
            }
        }
    }
}

/// Upstream HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Total request timeout in seconds. `None` leaves the upstream call
    /// unbounded; long streaming transfers are expected.
    pub timeout_secs: Option<u64>,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            connect_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
