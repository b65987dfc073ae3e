use axum_server::Handle;
use lobbyd::config::Config;
use lobbyd::lobby::{SqliteLobbyStore, spawn_sweeper};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    lobbyd::logging::init(config.log_file.as_deref())?;

    // No plaintext fallback: missing or unreadable credentials abort startup
    let credentials = config.tls_credentials()?;
    let tls_config = lobbyd::tls::load(&credentials).await?;

    let pool = lobbyd::db::connect(&config.database_url).await?;
    let store = SqliteLobbyStore::new(pool);

    let (stop_sweeper, sweeper_shutdown) = watch::channel(false);
    let sweeper = spawn_sweeper(
        Arc::new(store.clone()),
        config.sweep_policy(),
        sweeper_shutdown,
    );

    let addr: SocketAddr = config.addr().parse()?;
    info!("Starting server on https://{}", addr);

    let handle = Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal().await;
            handle.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_TIMEOUT));
        }
    });

    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(lobbyd::app_with_store(store).into_make_service())
        .await?;

    let _ = stop_sweeper.send(true);
    if let Err(e) = sweeper.await {
        error!(error = %e, "Lobby sweeper panicked");
    }

    info!("Server stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
