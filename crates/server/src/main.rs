use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reel_core::{
    load_config, validate_config, CatalogReader, KeyValueStorage, SqliteKeyValueStorage,
    TmdbClient, WatchlistStore,
};
use reel_server::api::create_router;
use reel_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("REEL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Storage path: {:?}", config.storage.path);

    // Open key/value storage
    let mut storage = SqliteKeyValueStorage::new(&config.storage.path)
        .context("Failed to open watchlist storage")?;
    if let Some(limit) = config.storage.quota() {
        storage = storage.with_quota(limit);
    }
    let storage: Arc<dyn KeyValueStorage> = Arc::new(storage);

    // Load the watchlist (never fails, corrupt data starts empty)
    let watchlist = Arc::new(WatchlistStore::open(
        storage,
        config.storage.watchlist_key.clone(),
    ));

    // Create catalog reader if configured
    let catalog: Option<Arc<dyn CatalogReader>> = match &config.tmdb {
        Some(tmdb_config) => {
            info!("Initializing TMDB client");
            let client =
                TmdbClient::new(tmdb_config.clone()).context("Failed to create TMDB client")?;
            Some(Arc::new(client))
        }
        None => {
            info!("TMDB not configured, catalog views disabled");
            None
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), watchlist, catalog));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
