//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: optional TOML file, then environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config.relay.normalize();
    Ok(config)
}

/// Apply `RELAY_*` environment overrides on top of a loaded config.
///
/// The variable source is injected so tests can exercise overrides without
/// mutating process-level environment.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = var("RELAY_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(hosts) = var("RELAY_ALLOWED_HOSTS") {
        config.relay.allowed_hosts = parse_allow_list(&hosts);
    }
    if let Some(agent) = var("RELAY_USER_AGENT") {
        config.relay.user_agent = agent;
    }
    if let Some(secs) = var("RELAY_UPSTREAM_TIMEOUT_SECS") {
        match secs.parse::<u64>() {
            Ok(secs) => config.upstream.timeout_secs = Some(secs),
            Err(_) => tracing::warn!(
                value = %secs,
                "Ignoring unparseable RELAY_UPSTREAM_TIMEOUT_SECS"
            ),
        }
    }
}

/// Parse a comma-separated hostname list. Empty input means no restriction.
pub fn parse_allow_list(raw: &str) -> Option<Vec<String>> {
    let hosts: Vec<String> = raw
        .split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect();

    if hosts.is_empty() {
        None
    } else {
        Some(hosts)
    }
}
