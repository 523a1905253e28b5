//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the relay handler on every path
//! - Wire up middleware (tracing, request ID)
//! - Build the shared upstream client once
//! - Serve with graceful shutdown (signal or coordinator)

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::handler::relay_handler;
use crate::http::request_id::propagate_request_id;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub client: reqwest::Client,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The upstream client is built once here and shared across requests;
    /// the total timeout is only applied when configured, since the relay is
    /// expected to carry long streaming transfers.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let config = Arc::new(config);

        // Redirects are relayed verbatim, never followed: following one
        // would break exact response mirroring and would let an allowed
        // host steer the relay to a hostname the allow-list never vetted.
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(config.upstream.connect_timeout_secs));
        if let Some(secs) = config.upstream.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let state = AppState { config, client };

        let router = Self::build_router(state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(middleware::from_fn(propagate_request_id))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until a
    /// Ctrl+C or a shutdown broadcast arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
