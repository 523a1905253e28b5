//! CORS Forwarding Relay
//!
//! A single-endpoint HTTP relay built with Tokio and Axum. It accepts an
//! inbound request, derives a target URL (and optional extra headers) from
//! the query string, forwards the request upstream, and streams the response
//! back with permissive cross-origin headers attached.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 CORS RELAY                    │
//!                      │                                               │
//!   Browser Request    │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ──────────────────▶│  │  http   │──▶│ validate │──▶│  headers  │  │
//!     ?url=…&h64=…     │  │ server  │   │  target  │   │  rewrite  │  │
//!                      │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!                      │                                     │        │
//!   Browser Response   │  ┌─────────┐   ┌──────────┐   ┌─────▼─────┐  │      Target
//!   ◀──────────────────│  │  cors   │◀──│ response │◀──│ upstream  │◀─┼───── Server
//!                      │  │ headers │   │  stream  │   │  client   │  │
//!                      │  └─────────┘   └──────────┘   └───────────┘  │
//!                      │                                               │
//!                      │  config (allow-list) · observability · id    │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cors_relay::config::loader::load_config;
use cors_relay::http::HttpServer;
use cors_relay::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(about = "Single-endpoint CORS forwarding relay", long_about = None)]
struct Cli {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration before tracing init so the configured level can
    // serve as the fallback filter.
    let config = load_config(cli.config.as_deref())?;

    let default_filter = format!("cors_relay={},tower_http=info", config.observability.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        allowed_hosts = ?config.relay.allowed_hosts,
        upstream_timeout_secs = ?config.upstream.timeout_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics endpoint
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            cors_relay::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
