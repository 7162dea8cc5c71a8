use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use fx_insights::analytics::{executive_brief, flag_anomalies, summarize};
use fx_insights::export::write_csv;
use fx_insights::loader::{load_with_fallback, DataOrigin, TableCache};
use fx_insights::storage::LocalStore;
use fx_insights::PipelineConfig;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: fx-insights [partition_directory] [log_level:optional] > [output].csv");
        eprintln!("Log levels: off, error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let location = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let config = PipelineConfig::default();
    let cache = TableCache::from_config(&config);
    let store = LocalStore::new(location).with_page_size(config.page_size);

    let timer = Instant::now();
    let outcome = load_with_fallback(&cache, &store, "", &config)?;

    match &outcome.origin {
        DataOrigin::Storage { location, fetched_at } => info!("Loaded [{location}] at {fetched_at}"),
        DataOrigin::Sample { path, reason } => warn!("Using sample file [{}]: {reason}", path.display()),
        DataOrigin::Synthetic { reason } => warn!("Using synthetic data: {reason}")
    }

    let summary = summarize(&outcome.table);
    let anomalies = flag_anomalies(&outcome.table);

    info!("Summarized {} transactions in: {:?}", summary.total_count, timer.elapsed());

    for line in executive_brief(&summary, &anomalies).lines() {
        info!("{line}");
    }

    for top in &anomalies.top {
        info!("Top transaction {} ({}): ${}", top.txn_id, top.currency, top.amount_usd);
    }

    let mut output = BufWriter::new(stdout().lock());
    write_csv(&outcome.table, &mut output)?;
    output.flush()?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or_else(|_| {
        eprintln!("Unknown log level [{level}], logging errors only");
        LevelFilter::ERROR
    })
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the CSV export
    let stderr_log = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(stderr_log)
        .init();
}
