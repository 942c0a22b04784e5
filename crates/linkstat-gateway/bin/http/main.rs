mod cli;

use crate::cli::{Cli, StorageBackendArg};
use clap::Parser;
use linkstat_core::{CounterStore, SystemClock};
use linkstat_gateway::{App, AppState};
use linkstat_shortener::{ServiceSettings, Shortener, ShortenerService};
use linkstat_storage::{InMemoryCounterStore, RedisCounterStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    linkstat_telemetry::init(config.log_format.into(), &config.log_level)?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        sequence_seed = config.sequence_seed,
        "starting gateway server"
    );

    let settings = ServiceSettings::builder()
        .sequence_seed(config.sequence_seed)
        .build();

    let shortener = match config.storage {
        StorageBackendArg::InMemory => {
            build_shortener(InMemoryCounterStore::new(), settings).await?
        }
        StorageBackendArg::Redis => {
            let store = RedisCounterStore::connect(&config.redis_url).await?;
            build_shortener(store, settings).await?
        }
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(AppState::new(shortener)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_shortener<S: CounterStore>(
    store: S,
    settings: ServiceSettings,
) -> anyhow::Result<Arc<dyn Shortener>> {
    let service = ShortenerService::with_clock(store, SystemClock, settings);
    service.initialize().await?;
    Ok(Arc::new(service))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
