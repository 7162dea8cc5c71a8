use super::{base_fx_rate, generate, write_sample, GeneratorConfig, SyntheticGenerator, DEFAULT_START_DATE};

use std::collections::{BTreeMap, HashSet};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tempfile::TempDir;

use crate::export::read_csv;
use crate::models::{convert_to_base, validate_schema};
use crate::types::{Currency, ProductType};

#[test]
fn test_generator_is_deterministic_for_a_seed() {
    let first = generate(42, 500);
    let second = generate(42, 500);
    let other = generate(7, 500);

    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[test]
fn test_generated_rows_satisfy_record_invariants() -> Result<()> {
    let table = generate(42, 2000);

    assert_eq!(table.len(), 2000);
    validate_schema(&table)?;

    for transaction in table.iter() {
        let amount = transaction.amount.ok_or_else(|| anyhow!("amount missing"))?;
        let fx_rate = transaction.fx_rate.ok_or_else(|| anyhow!("fx rate missing"))?;

        assert!(amount > Decimal::ZERO, "amount must be positive: {amount}");
        assert!(transaction.amount_usd > Decimal::ZERO);
        assert_eq!(Some(transaction.amount_usd), convert_to_base(amount, fx_rate));
        assert_eq!(transaction.base_currency, "USD");
        assert!(transaction.customer_id.is_some());
        assert!(transaction.product_type.is_some());
        assert!(transaction.channel.is_some());
        assert!(transaction.merchant_country.is_some());
        assert!(transaction.customer_segment.is_some());
    }

    Ok(())
}

#[test]
fn test_generated_dates_stay_inside_the_window() -> Result<()> {
    let config = GeneratorConfig::default();
    let start = config.start_date;
    let end = NaiveDate::from_ymd_opt(2025, 11, 29).ok_or_else(|| anyhow!("invalid date"))?;
    let table = SyntheticGenerator::new(GeneratorConfig { rows: 1000, ..config }).generate();

    for transaction in table.iter() {
        let date = transaction.txn_date.ok_or_else(|| anyhow!("date missing"))?;
        assert!(date >= start && date <= end, "{date} outside window");
    }

    Ok(())
}

#[test]
fn test_default_window_starts_on_the_first_of_september() -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2025, 9, 1).ok_or_else(|| anyhow!("invalid date"))?;

    assert_eq!(DEFAULT_START_DATE, start);
    assert_eq!(GeneratorConfig::default().start_date, start);

    let earliest = generate(42, 2000).iter().filter_map(|transaction| transaction.txn_date).min();
    assert_eq!(earliest, Some(start));

    Ok(())
}

#[test]
fn test_transaction_ids_are_sequential_and_unique() {
    let table = generate(1, 100);
    let ids: HashSet<&str> = table.iter().map(|transaction| transaction.txn_id.as_str()).collect();

    assert_eq!(ids.len(), 100);
    assert_eq!(table.records()[0].txn_id, "TXN0000001");
    assert_eq!(table.records()[99].txn_id, "TXN0000100");
}

#[test]
fn test_currency_mix_follows_configured_weights() {
    let table = generate(42, 5000);
    let mut counts: BTreeMap<Currency, usize> = BTreeMap::new();

    for transaction in table.iter() {
        *counts.entry(transaction.currency).or_default() += 1;
    }

    let usd_share = counts.get(&Currency::Usd).copied().unwrap_or_default() as f64 / 5000.0;
    let sgd_share = counts.get(&Currency::Sgd).copied().unwrap_or_default() as f64 / 5000.0;

    assert!((usd_share - 0.30).abs() < 0.03, "USD share {usd_share}");
    assert!((sgd_share - 0.02).abs() < 0.01, "SGD share {sgd_share}");
}

#[test]
fn test_fx_rate_jitter_stays_within_two_percent() -> Result<()> {
    let table = generate(42, 3000);

    for transaction in table.iter() {
        let fx_rate = transaction.fx_rate.and_then(|rate| rate.to_f64()).ok_or_else(|| anyhow!("fx rate missing"))?;
        let base = base_fx_rate(transaction.currency);

        assert!((fx_rate / base - 1.0).abs() <= 0.0201, "{fx_rate} drifted too far from {base}");
    }

    Ok(())
}

#[test]
fn test_amount_ranges_differ_by_product() {
    let table = generate(42, 5000);
    let mut max_amount: BTreeMap<ProductType, Decimal> = BTreeMap::new();

    for transaction in table.iter() {
        if let (Some(product), Some(amount)) = (transaction.product_type, transaction.amount) {
            let entry = max_amount.entry(product).or_insert(Decimal::ZERO);
            *entry = (*entry).max(amount);
        }
    }

    assert!(max_amount[&ProductType::Retail] <= Decimal::from(200));
    assert!(max_amount[&ProductType::Subscription] <= Decimal::new(9999, 2));
    assert!(max_amount[&ProductType::Investment] > Decimal::from(50_000));
}

#[test]
fn test_write_sample_persists_a_readable_table() -> Result<()> {
    let directory = TempDir::new()?;
    let path = directory.path().join("samples").join("sample_normalized.csv");

    let written = write_sample(&path, 42, 250)?;
    let read_back = read_csv(std::fs::File::open(&path)?)?;

    assert_eq!(read_back, written);

    Ok(())
}
