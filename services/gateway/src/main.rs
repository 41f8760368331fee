mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use clap::Parser;
use config::CliArgs;
use fleet_state::LogRegistry;
use router::create_router;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse();

    tracing::info!("Starting Fleet State server");

    // Initialize application state
    let registry = Arc::new(LogRegistry::new());
    let state = AppState::new(Arc::clone(&registry));

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(args.http_addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    let shutdown = CancellationToken::new();
    let graceful = shutdown.clone();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { graceful.cancelled().await })
            .into_future(),
    );

    tokio::select! {
        res = &mut server => {
            res??;
            return Ok(());
        }
        () = shutdown_signal() => {
            info!("Exiting...");
        }
    }

    // open streams never finish on their own; closing the readers ends them
    registry.close();
    shutdown.cancel();

    match tokio::time::timeout(args.shutdown_timeout(), server).await {
        Ok(res) => res??,
        Err(_) => warn!(
            timeout_secs = args.http_shutdown_timeout_secs,
            "Graceful shutdown timed out"
        ),
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C");
        }
        () = terminate => {
            info!("Received SIGTERM");
        }
    }
}
