//! lifecache - client-side data cache for plans, wishes and user data
//!
//! Runs the cache registry with its monitor and serves the HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lifecache::api::{create_router, AppState};
use lifecache::cache::{DurableStorage, FileStorage, MemoryStorage};
use lifecache::source::{CachedDataSource, DataFetchers};
use lifecache::{spawn_monitor_task, CacheRegistry, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the durable mirror (memory fallback if the directory is unusable)
/// 4. Build the cache registry and optional data source
/// 5. Start the background monitor task
/// 6. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifecache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting lifecache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_dir={}, quota={:?}, port={}, health_check_interval={}s, debug={}",
        config.cache_dir.display(),
        config.cache_quota_bytes,
        config.server_port,
        config.health_check_interval,
        config.debug
    );

    let storage: Arc<dyn DurableStorage> =
        match FileStorage::open(&config.cache_dir, config.cache_quota_bytes) {
            Ok(storage) => Arc::new(storage),
            Err(err) => {
                warn!(
                    "Durable mirror unavailable at {}: {}; falling back to memory",
                    config.cache_dir.display(),
                    err
                );
                Arc::new(MemoryStorage::new())
            }
        };

    let registry = CacheRegistry::new(storage);
    let state = match &config.data_api_url {
        Some(url) => {
            info!("Data source: {}", url);
            AppState::with_source(CachedDataSource::new(
                registry.clone(),
                DataFetchers::http(url),
            ))
        }
        None => AppState::new(registry.clone()),
    };
    info!("Cache registry initialized");

    let monitor_handle = spawn_monitor_task(registry, config.health_check_period());
    info!("Cache monitor started");

    if config.debug {
        warn!("Debug mode: cache debug routes mounted under /debug/cache");
    }
    let app = create_router(state, config.debug);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(monitor_handle))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the monitor task and allows graceful shutdown.
async fn shutdown_signal(monitor_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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

    monitor_handle.abort();
    warn!("Cache monitor aborted");
}
