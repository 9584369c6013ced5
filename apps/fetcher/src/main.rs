mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use config::FetcherConfig;
use fondkurs_core::{IngestService, SnapshotStore};
use fondkurs_market_data::{
    MorningstarSource, PriceSource, SourceChain, YahooSource, DEFAULT_CALL_TIMEOUT,
};

/// Fetch fund prices and rewrite the snapshot document.
#[derive(Parser, Debug)]
#[command(name = "fondkurs-fetcher")]
#[command(about = "Fetch fund prices and rewrite the snapshot", long_about = None)]
#[command(version)]
struct Cli {
    /// Instrument configuration file
    #[arg(long, default_value = "fondkurs.json")]
    config: std::path::PathBuf,

    /// Snapshot file to read and rewrite
    #[arg(long, default_value = "data/prices.json")]
    output: std::path::PathBuf,

    /// Per-source call deadline in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Instruments fetched concurrently
    #[arg(long)]
    max_parallel: Option<usize>,

    /// Fetch and report without writing the snapshot
    #[arg(long)]
    dry_run: bool,
}

fn init_tracing() {
    let log_format = std::env::var("FONDKURS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    let config = FetcherConfig::load(&cli.config)?;

    let sources: Vec<Arc<dyn PriceSource>> = vec![
        Arc::new(YahooSource::new()?),
        Arc::new(MorningstarSource::new()),
    ];
    let call_timeout = cli
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_CALL_TIMEOUT);
    let chain = Arc::new(SourceChain::with_timeout(sources, call_timeout));

    let mut service = IngestService::new(chain, SnapshotStore::new(cli.output));
    if let Some(max_parallel) = cli.max_parallel {
        service = service.with_max_parallel(max_parallel);
    }

    let report = if cli.dry_run {
        service.dry_run(&config.instruments).await?
    } else {
        service.run(&config.instruments).await?
    };

    tracing::info!(
        "Done: {} live, {} carried of {} instrument(s), updatedAt {}",
        report.live,
        report.carried,
        report.total,
        report.updated_at
    );
    Ok(())
}
