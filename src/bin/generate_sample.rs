use std::env;
use std::path::PathBuf;

use anyhow::Result;

use fx_insights::analytics::summarize;
use fx_insights::generator::{write_sample, DEFAULT_ROWS, DEFAULT_SEED};

const DEFAULT_OUTPUT: &str = "samples/sample_normalized.csv";

struct SampleArgs {
    rows: usize,
    seed: u64,
    output_path: PathBuf
}

impl SampleArgs {
    fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let rows = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_ROWS);
        let seed = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_SEED);
        let output_path = args.get(3).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        Self { rows, seed, output_path }
    }
}

fn main() -> Result<()> {
    let args = SampleArgs::from_args();

    println!(
        "Generating {} transactions with seed {} in {}...",
        args.rows, args.seed, args.output_path.display()
    );

    let table = write_sample(&args.output_path, args.seed, args.rows)?;
    let summary = summarize(&table);

    println!(
        "Generation complete: {} rows, ${} total volume, {} currencies, {} customers.",
        summary.total_count,
        summary.total_volume.round_dp(2),
        summary.distinct_currencies,
        summary.distinct_customers
    );

    Ok(())
}
