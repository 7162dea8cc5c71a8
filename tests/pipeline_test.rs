use std::fs;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use tempfile::TempDir;

use fx_insights::analytics::{flag_anomalies, summarize};
use fx_insights::export::{read_csv, to_csv_bytes};
use fx_insights::filters::{apply_filters, Filters};
use fx_insights::generator::generate;
use fx_insights::loader::{load_with_fallback, DataOrigin, TableCache};
use fx_insights::models::{ColumnSet, Table, Transaction};
use fx_insights::storage::LocalStore;
use fx_insights::types::{Column, Currency};
use fx_insights::PipelineConfig;

#[test]
fn test_same_seed_produces_byte_identical_tables() -> Result<()> {
    let first = to_csv_bytes(&generate(42, 5000))?;
    let second = to_csv_bytes(&generate(42, 5000))?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_jpy_filter_summarizes_to_a_single_currency() -> Result<()> {
    let table = generate(42, 5000);
    let filtered = apply_filters(&table, &Filters::new().with_currency(Currency::Jpy));
    let summary = summarize(&filtered);

    assert!(summary.total_count > 0);
    assert_eq!(summary.distinct_currencies, 1);

    let top = summary.top_currency.ok_or_else(|| anyhow!("top currency missing"))?;
    assert_eq!(top.key, "JPY");
    assert!((top.share_pct - 100.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_usd_volume_matches_converted_amounts() -> Result<()> {
    let table = generate(42, 5000);
    let mut expected = Decimal::ZERO;

    for transaction in table.iter() {
        let amount = transaction.amount.ok_or_else(|| anyhow!("amount missing"))?;
        let fx_rate = transaction.fx_rate.ok_or_else(|| anyhow!("fx rate missing"))?;
        expected += amount * fx_rate;
    }

    let difference = (summarize(&table).total_volume - expected).abs();

    // Each row rounds to the cent, so the drift is bounded by half a cent per row.
    assert!(difference <= Decimal::new(5, 3) * Decimal::from(table.len()));

    Ok(())
}

#[test]
fn test_anomaly_counts_are_nested() {
    for seed in [1, 42, 1234] {
        let report = flag_anomalies(&generate(seed, 2000));

        assert!(report.very_high_count <= report.high_count);
        assert!(report.high_count <= report.total);
    }
}

#[test]
fn test_eur_conversion_survives_csv_round_trip() -> Result<()> {
    let transaction = Transaction::converted("TXN0000001", Currency::Eur, Decimal::from(1000), Decimal::from_str("1.08")?)?;

    assert_eq!(transaction.amount_usd, Decimal::from_str("1080.00")?);
    assert_eq!(transaction.amount_usd.to_string(), "1080.00");

    let table = Table::new(ColumnSet::full(), vec![transaction]);
    let read_back = read_csv(to_csv_bytes(&table)?.as_slice())?;
    let difference = (read_back.records()[0].amount_usd - Decimal::from_str("1080.00")?).abs();

    assert!(difference <= Decimal::from_str("0.01")?);

    Ok(())
}

#[test]
fn test_partitioned_directory_loads_through_the_cache() -> Result<()> {
    let directory = TempDir::new()?;

    for (currency, rows) in [("EUR", "T1,2025-09-01,1000,1.08,ECOM\nT2,2025-09-02,50,1.08,POS\n"), ("JPY", "T3,2025-09-03,150000,0.0067,TRAVEL\n")] {
        let partition = directory.path().join("output").join("normalized").join(format!("currency={currency}"));
        fs::create_dir_all(&partition)?;
        fs::write(partition.join("part-00000.csv"), format!("txn_id,txn_date,amount,fx_rate,product_type\n{rows}"))?;
    }

    let store = LocalStore::new(directory.path());
    let config = PipelineConfig::default();
    let cache = TableCache::from_config(&config);

    let outcome = load_with_fallback(&cache, &store, "output/normalized/", &config)?;

    assert!(matches!(outcome.origin, DataOrigin::Storage { .. }));
    assert_eq!(outcome.table.len(), 3);
    assert!(outcome.table.has(Column::AmountUsd));
    assert!(!outcome.table.has(Column::Channel));

    let summary = summarize(&outcome.table);

    assert_eq!(summary.distinct_currencies, 2);
    assert_eq!(summary.total_volume, Decimal::from_str("2139.00")?);
    assert!(summary.by_channel.is_none());

    Ok(())
}

#[test]
fn test_unreachable_storage_falls_back_to_synthetic_data() -> Result<()> {
    let store = LocalStore::new("/no/such/partition/root");
    let config = PipelineConfig::default().with_fallback(42, 500);
    let cache = TableCache::from_config(&config);

    let outcome = load_with_fallback(&cache, &store, "", &config)?;

    assert!(matches!(outcome.origin, DataOrigin::Synthetic { .. }));
    assert!(outcome.fallback_reason().is_some());
    assert_eq!(to_csv_bytes(&outcome.table)?, to_csv_bytes(&generate(42, 500))?);

    Ok(())
}

#[test]
fn test_empty_selection_summarizes_without_failing() {
    let table = Table::new(ColumnSet::full(), vec![Transaction::new("T1", Currency::Usd, Decimal::from(10))]);
    let filtered = apply_filters(&table, &Filters::new().with_currency(Currency::Eur));

    let summary = summarize(&filtered);
    let report = flag_anomalies(&filtered);

    assert_eq!(summary.total_count, 0);
    assert_eq!(summary.mean_volume, None);
    assert_eq!(report.anomaly_rate_pct, 0.0);
}
