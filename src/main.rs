use listing_scout::config::WatchConfig;
use listing_scout::engine::WatchEngine;
use listing_scout::sinks::{FileSink, LogSink};
use listing_scout::sources::{BezrealitkySource, HttpFetcher, SrealitySource};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "listing-scout.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("🏠 Listing Scout - real-estate ad watcher");

    let config = WatchConfig::load(CONFIG_PATH).await?;

    let fetcher = Arc::new(HttpFetcher::new()?);

    let mut engine = WatchEngine::new(config.engine.clone());
    engine.register_source(Arc::new(SrealitySource::new(fetcher.clone())));
    engine.register_source(Arc::new(BezrealitkySource::new(fetcher)));
    engine.register_sink(Arc::new(LogSink::new(config.sinks.log_enabled)));
    engine.register_sink(Arc::new(FileSink::new(&config.sinks.file)));

    engine.start().await?;
    info!(
        "Watching for new ads every {} minutes, press Ctrl-C to stop",
        config.engine.poll_interval_minutes
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    engine.stop().await?;

    Ok(())
}
