// Editor Relay - SSE bridge between a static front-end and a completion API
//
// A browser on a separate origin posts one message; the relay adds the
// editor persona, calls the upstream completion API with the server-side
// credential, and streams the reply back as Server-Sent Events.
//
// Architecture:
// - Relay server (axum): CORS, method gate, SSE response per request
// - Upstream client (reqwest): one streaming call per request, no retry
// - Config: env > ~/.config/editor-relay/config.toml > defaults

mod cli;
mod config;
mod events;
mod relay;
mod startup;

use anyhow::Result;
use config::{Config, LogRotation, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing: stdout always, plus an optional rotating JSON file.
///
/// Precedence: RUST_LOG env var > config file > default "info".
/// The returned guard must stay alive for file logs to flush.
fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let default_filter = format!("editor_relay={}", logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    if !logging.file_enabled {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&logging.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            logging.file_dir, e
        );
        // Fall back to stdout only
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        return None;
    }

    let file_appender = match logging.file_rotation {
        LogRotation::Hourly => {
            tracing_appender::rolling::hourly(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Daily => {
            tracing_appender::rolling::daily(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Never => {
            tracing_appender::rolling::never(&logging.file_dir, &logging.file_prefix)
        }
    };

    // Writes happen on a background thread
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --path, --init)
    if cli::handle_cli()? {
        return Ok(());
    }

    let config = Config::from_env()?;
    let _file_guard = init_logging(&config.logging);

    startup::print_startup(&config);
    startup::log_startup(&config);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let relay_config = config.clone();
    let mut relay_handle =
        tokio::spawn(async move { relay::start_relay(relay_config, shutdown_rx).await });

    tokio::select! {
        result = &mut relay_handle => {
            // Server stopped on its own (bind failure, etc.)
            return result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
        }
    }

    tracing::info!("Shutting down...");

    // If the send fails, the server has already shut down (which is fine)
    let _ = shutdown_tx.send(());
    relay_handle.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
