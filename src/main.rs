//! Wind Collector - Main Entry Point
//!
//! Usage: `wind-collector [config.toml] [--once]`

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use wind_collector::domain::config::AppConfig;
use wind_collector::services::{Collector, CsvStore, HttpSource};

#[derive(Parser, Debug)]
#[command(
    name = "wind-collector",
    version,
    about = "Samples a weather station readout into a compacted CSV history"
)]
struct Cli {
    /// Config file; defaults to config.toml in the platform config directory
    config: Option<PathBuf>,

    /// Collect one sample, print it as JSON and exit
    #[arg(long)]
    once: bool,
}

/// `RUST_LOG`-style directives, `info` when unset or unparsable
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    let stdout = tracing_subscriber::fmt::layer();

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "wind-collector.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stdout).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = AppConfig::locate(cli.config.as_deref()).context("locating configuration")?;
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;
    let _log_guard = init_tracing(&config);

    tracing::info!("Starting wind collector...");
    match &config_path {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("No config file found, using defaults"),
    }

    let store_path = config.resolve_store_path().context("resolving store path")?;
    let source = HttpSource::new(config.base_url.clone(), config.request_timeout())
        .context("building HTTP client")?;
    let store = CsvStore::new(&store_path).with_write_timeout(config.write_timeout());
    let collector = Arc::new(
        Collector::open(source, store, config.retention_ms())
            .with_context(|| format!("opening store {}", store_path.display()))?,
    );

    if cli.once {
        let sample = collector.collect_now().await.context("collecting sample")?;
        println!("{}", sample.to_json()?);
        return Ok(());
    }

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let background = {
        let collector = collector.clone();
        let interval = config.fetch_interval();
        tokio::spawn(async move { collector.run_periodic(interval, stop_rx).await })
    };

    tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    tracing::info!("Shutdown requested");
    // Ignore: the loop may already have exited
    let _ = stop_tx.send(true);
    background.await.context("joining collector task")?;

    Ok(())
}
