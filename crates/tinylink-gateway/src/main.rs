mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use crate::app::App;
use crate::cli::{LogFormatArg, StorageBackendArg, CLI};
use crate::state::AppState;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tinylink_core::MappingStore;
use tinylink_generator::Sha256Base58Generator;
use tinylink_store::{InMemoryMappingStore, RedisMappingStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    init_logging(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        ttl_secs = config.ttl_secs,
        "starting tinylink gateway"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            let store = InMemoryMappingStore::with_ttl(config.ttl())?;
            run_server(config.listen_addr, config.base_url, Arc::new(store)).await?;
        }
        StorageBackendArg::Redis => {
            // No live backend means nothing to serve; bail out before binding.
            let store = RedisMappingStore::connect(&config.store_settings()).await?;
            run_server(
                config.listen_addr,
                config.base_url,
                Arc::new(store.clone()),
            )
            .await?;
            store.close();
        }
    }

    info!("tinylink gateway stopped");
    Ok(())
}

fn init_logging(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormatArg::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormatArg::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

async fn run_server(
    listen_addr: SocketAddr,
    base_url: String,
    store: Arc<dyn MappingStore>,
) -> std::io::Result<()> {
    let state = AppState::new(store, Arc::new(Sha256Base58Generator::new()), base_url);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
