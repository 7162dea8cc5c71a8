use super::{apply_filters, FilterOptions, Filters, Selection};

use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::generator::generate;
use crate::models::{ColumnSet, Table, Transaction};
use crate::types::{Channel, Column, Currency, ProductType};

fn date(day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 9, day).ok_or_else(|| anyhow!("invalid day {day}"))
}

fn create_transaction(txn_id: &str, currency: Currency, day: u32, product: ProductType, channel: Channel) -> Result<Transaction> {
    let mut transaction = Transaction::new(txn_id, currency, Decimal::from(100));
    transaction.txn_date = Some(date(day)?);
    transaction.product_type = Some(product);
    transaction.channel = Some(channel);
    Ok(transaction)
}

fn small_table() -> Result<Table> {
    Ok(Table::new(ColumnSet::full(), vec![
        create_transaction("T1", Currency::Usd, 1, ProductType::Ecom, Channel::Online)?,
        create_transaction("T2", Currency::Eur, 5, ProductType::Travel, Channel::Pos)?,
        create_transaction("T3", Currency::Usd, 10, ProductType::Travel, Channel::Mobile)?,
        create_transaction("T4", Currency::Jpy, 15, ProductType::Forex, Channel::Online)?,
        create_transaction("T5", Currency::Usd, 20, ProductType::Ecom, Channel::Wire)?,
    ]))
}

fn ids(table: &Table) -> Vec<&str> {
    table.iter().map(|transaction| transaction.txn_id.as_str()).collect()
}

#[test]
fn test_empty_filters_keep_every_row() -> Result<()> {
    let table = small_table()?;
    let filtered = apply_filters(&table, &Filters::new());

    assert!(Filters::new().is_empty());
    assert_eq!(filtered, table);

    Ok(())
}

#[test]
fn test_date_range_is_inclusive_on_both_ends() -> Result<()> {
    let table = small_table()?;
    let filtered = apply_filters(&table, &Filters::new().with_date_range(date(5)?, date(15)?));

    assert_eq!(ids(&filtered), vec!["T2", "T3", "T4"]);

    Ok(())
}

#[test]
fn test_filters_compose_conjunctively() -> Result<()> {
    let table = small_table()?;
    let filters = Filters::new()
        .with_currency(Currency::Usd)
        .with_product_type(ProductType::Ecom)
        .with_channel(Channel::Wire);

    assert_eq!(ids(&apply_filters(&table, &filters)), vec!["T5"]);

    Ok(())
}

#[test]
fn test_no_matching_rows_is_an_empty_table_not_an_error() -> Result<()> {
    let table = small_table()?;
    let filtered = apply_filters(&table, &Filters::new().with_currency(Currency::Chf));

    assert!(filtered.is_empty());
    assert_eq!(filtered.columns(), table.columns());

    Ok(())
}

#[test]
fn test_filtering_does_not_mutate_the_source() -> Result<()> {
    let table = small_table()?;
    let snapshot = table.clone();

    let _ = apply_filters(&table, &Filters::new().with_currency(Currency::Eur));

    assert_eq!(table, snapshot);

    Ok(())
}

#[test]
fn test_apply_filters_is_idempotent() -> Result<()> {
    let table = generate(42, 1500);
    let filter_sets = vec![
        Filters::new(),
        Filters::new().with_currency(Currency::Gbp),
        Filters::new().with_date_range(date(10)?, date(20)?).with_channel(Channel::Atm),
        Filters::new().with_product_type(ProductType::Investment).with_currency(Currency::Usd),
    ];

    for filters in filter_sets {
        let once = apply_filters(&table, &filters);
        let twice = apply_filters(&once, &filters);

        assert_eq!(once, twice);
    }

    Ok(())
}

#[test]
fn test_filters_on_unavailable_columns_are_ignored() -> Result<()> {
    let columns: ColumnSet = [Column::TxnId, Column::Currency, Column::AmountUsd].into_iter().collect();
    let table = Table::new(columns, vec![
        Transaction::new("T1", Currency::Usd, Decimal::from_str("1.00")?),
        Transaction::new("T2", Currency::Eur, Decimal::from_str("2.00")?),
    ]);

    let filters = Filters::new()
        .with_product_type(ProductType::Ecom)
        .with_date_range(date(1)?, date(2)?);

    assert_eq!(apply_filters(&table, &filters).len(), 2);

    Ok(())
}

#[test]
fn test_rows_with_null_dimension_fail_a_specific_selection() -> Result<()> {
    let mut missing_channel = create_transaction("T9", Currency::Usd, 3, ProductType::Ecom, Channel::Online)?;
    missing_channel.channel = None;

    let table = Table::new(ColumnSet::full(), vec![missing_channel]);

    assert!(apply_filters(&table, &Filters::new().with_channel(Channel::Online)).is_empty());
    assert_eq!(apply_filters(&table, &Filters::new()).len(), 1);

    Ok(())
}

#[test]
fn test_selection_parses_all_case_insensitively() -> Result<()> {
    assert_eq!(Selection::<Currency>::from_str("All")?, Selection::All);
    assert_eq!(Selection::<Currency>::from_str("all")?, Selection::All);
    assert_eq!(Selection::<Currency>::from_str("jpy")?, Selection::Only(Currency::Jpy));
    assert!(Selection::<Channel>::from_str("FAX").is_err());

    Ok(())
}

#[test]
fn test_filter_options_list_distinct_sorted_values() -> Result<()> {
    let options = FilterOptions::from_table(&small_table()?);

    assert_eq!(options.currencies, vec![Currency::Usd, Currency::Eur, Currency::Jpy]);
    assert_eq!(options.product_types, Some(vec![ProductType::Ecom, ProductType::Travel, ProductType::Forex]));
    assert_eq!(options.channels, Some(vec![Channel::Online, Channel::Pos, Channel::Mobile, Channel::Wire]));
    assert_eq!(options.date_bounds, Some((date(1)?, date(20)?)));

    Ok(())
}
