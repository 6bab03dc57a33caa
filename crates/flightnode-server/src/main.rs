//! FlightNode Server - Main entry point

use std::time::Duration;

use anyhow::Result;
use flightnode_common::logging::{init_logging, LogConfig};
use tokio::signal;
use tracing::info;

use flightnode_server::{api, config::Config, db};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::default()
        .with_file_prefix("flightnode-server")
        .with_filter("flightnode_server=debug,tower_http=debug,sqlx=warn")
        .merge_env()?;

    // Keep the guard alive so buffered file output is flushed on exit
    let _log_guard = init_logging(&log_config)?;

    info!("Starting FlightNode Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let state = api::AppState::postgres(pool);
    api::serve(state, &config, shutdown_signal(config.server.shutdown_timeout_secs)).await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
