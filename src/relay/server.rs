//! Relay server setup and initialization

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::any, Router};
use tokio::net::TcpListener;

use crate::config::Config;

use super::handlers::relay_handler;
use super::state::RelayState;

/// Largest accepted request body. A pitch is a short message; anything
/// bigger is answered with a "Message too large" error frame.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the router. Every path goes to the relay handler, which dispatches
/// on method itself.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/", any(relay_handler))
        .route("/*path", any(relay_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Start the relay server
pub async fn start_relay(
    config: Config,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    let bind_addr = config.bind_addr;
    let state = RelayState::new(config)?;
    let app = router(state);

    tracing::info!("Starting relay on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Relay listening on {}", bind_addr);

    // Stop accepting on shutdown; in-flight streams are allowed to finish
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Relay server shut down gracefully");
    Ok(())
}
