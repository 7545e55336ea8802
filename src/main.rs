//! Dublin Bikes - An in-memory bike-share station catalogue
//!
//! Serves the station API over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dublin_bikes::{
    api::create_router,
    spawn_cleanup_task, spawn_simulator,
    stations::{dataset, StationStore},
    tasks::SimulatorConfig,
    AppState, Config,
};

/// Main entry point for the Dublin Bikes server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the station dataset (fatal if missing or invalid)
/// 4. Start the cache cleanup task and the live-update simulator
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dublin_bikes=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dublin Bikes server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: data_path={}, cache_ttl={}s, port={}, simulator_interval={}s",
        config.data_path.display(),
        config.cache_ttl,
        config.server_port,
        config.simulator_interval
    );

    let records = dataset::load_from_path(&config.data_path)
        .with_context(|| format!("loading stations from {}", config.data_path.display()))?;
    let store = StationStore::with_records(records)
        .await
        .context("seeding station store")?;

    let state = AppState::new(store, config.cache_ttl());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cleanup_handle = spawn_cleanup_task(
        state.cache.clone(),
        config.cache_cleanup_interval,
        shutdown_rx.clone(),
    );
    let simulator_handle = if config.simulator_enabled {
        Some(spawn_simulator(
            state.stations.clone(),
            state.cache.clone(),
            SimulatorConfig::from(&config),
            shutdown_rx,
        ))
    } else {
        info!("Live-update simulator disabled");
        None
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("serving HTTP")?;

    if let Err(e) = cleanup_handle.await {
        warn!("Cache cleanup task ended abnormally: {}", e);
    }
    if let Some(handle) = simulator_handle {
        if let Err(e) = handle.await {
            warn!("Simulator task ended abnormally: {}", e);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then tells the background
/// tasks to stop.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Receivers may already be gone if the tasks exited on their own
    let _ = shutdown_tx.send(true);
}
