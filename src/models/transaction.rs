use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::models::errors::RecordError;
use crate::types::{Channel, Column, Currency, CustomerSegment, ProductType, BASE_CURRENCY};

const USD_DECIMAL_PLACES: u32 = 2;

/// A single normalized transaction of the unified table.
///
/// `currency` and `amount_usd` are always present. Every other source-dependent
/// column is optional because partitions are not required to carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub txn_id: String,
    pub customer_id: Option<String>,
    pub txn_date: Option<NaiveDate>,
    /// Original amount in `currency`.
    pub amount: Option<Decimal>,
    pub currency: Currency,
    /// Multiplier converting `amount` into the base currency.
    pub fx_rate: Option<Decimal>,
    /// Canonical comparison value in the base currency.
    pub amount_usd: Decimal,
    pub base_currency: String,
    pub product_type: Option<ProductType>,
    pub channel: Option<Channel>,
    pub merchant_country: Option<String>,
    pub customer_segment: Option<CustomerSegment>
}

impl Transaction {
    /// Creates a transaction carrying only the required fields.
    pub fn new(txn_id: impl Into<String>, currency: Currency, amount_usd: Decimal) -> Self {
        Self {
            txn_id: txn_id.into(),
            customer_id: None,
            txn_date: None,
            amount: None,
            currency,
            fx_rate: None,
            amount_usd,
            base_currency: BASE_CURRENCY.to_string(),
            product_type: None,
            channel: None,
            merchant_country: None,
            customer_segment: None
        }
    }

    /// Creates a transaction whose `amount_usd` is derived from `amount * fx_rate`.
    ///
    /// # Errors
    /// Returns `RecordError::Overflow` if the product does not fit in a `Decimal`.
    pub fn converted(txn_id: impl Into<String>, currency: Currency, amount: Decimal, fx_rate: Decimal) -> Result<Self, RecordError> {
        let amount_usd = convert_to_base(amount, fx_rate).ok_or_else(|| RecordError::overflow(amount, fx_rate))?;

        let mut transaction = Self::new(txn_id, currency, amount_usd);
        transaction.amount = Some(amount);
        transaction.fx_rate = Some(fx_rate);
        Ok(transaction)
    }

    /// Normalizes a decoded source row.
    ///
    /// # Errors
    /// Returns `RecordError` if:
    /// - `txn_id` or `currency` is missing.
    /// - `amount_usd` is missing and cannot be derived from `amount` and `fx_rate`.
    /// - A numeric field cannot be parsed or `amount_usd` is negative.
    /// - Deriving `amount_usd` overflows.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, RecordError> {
        let txn_id = raw.get(Column::TxnId)
            .ok_or_else(|| RecordError::missing(Column::TxnId))?
            .to_string();

        let currency_code = raw.get(Column::Currency).ok_or_else(|| RecordError::missing(Column::Currency))?;
        let currency = Currency::from_str(currency_code)
            .map_err(|error| RecordError::invalid(Column::Currency, currency_code, error))?;

        let amount = parse_decimal(raw, Column::Amount)?;
        let fx_rate = parse_decimal(raw, Column::FxRate)?;

        let amount_usd = match (parse_decimal(raw, Column::AmountUsd)?, amount, fx_rate) {
            (Some(amount_usd), _, _) => amount_usd,
            (None, Some(amount), Some(fx_rate)) => convert_to_base(amount, fx_rate)
                .ok_or_else(|| RecordError::overflow(amount, fx_rate))?,
            (None, _, _) => return Err(RecordError::missing(Column::AmountUsd))
        };

        if amount_usd < Decimal::ZERO {
            return Err(RecordError::negative(Column::AmountUsd, &amount_usd.to_string()));
        }

        Ok(Self {
            txn_id,
            customer_id: raw.get(Column::CustomerId).map(str::to_string),
            txn_date: parse_date(raw)?,
            amount,
            currency,
            fx_rate,
            amount_usd,
            base_currency: raw.get(Column::BaseCurrency).unwrap_or(BASE_CURRENCY).to_string(),
            product_type: parse_category(raw, Column::ProductType),
            channel: parse_category(raw, Column::Channel),
            merchant_country: raw.get(Column::MerchantCountry).map(str::to_string),
            customer_segment: parse_category(raw, Column::CustomerSegment)
        })
    }

    /// Renders the value of `column` the way it is written to CSV. Nulls render as an empty string.
    pub fn field(&self, column: Column) -> String {
        fn or_empty<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        match column {
            Column::TxnId => self.txn_id.clone(),
            Column::CustomerId => or_empty(&self.customer_id),
            Column::TxnDate => self.txn_date.map(|date| date.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            Column::Amount => or_empty(&self.amount),
            Column::Currency => self.currency.to_string(),
            Column::FxRate => or_empty(&self.fx_rate),
            Column::AmountUsd => self.amount_usd.to_string(),
            Column::BaseCurrency => self.base_currency.clone(),
            Column::ProductType => or_empty(&self.product_type),
            Column::Channel => or_empty(&self.channel),
            Column::MerchantCountry => or_empty(&self.merchant_country),
            Column::CustomerSegment => or_empty(&self.customer_segment)
        }
    }
}

/// Converts an amount into the base currency, rounded to cents. `None` on overflow.
pub fn convert_to_base(amount: Decimal, fx_rate: Decimal) -> Option<Decimal> {
    amount.checked_mul(fx_rate).map(|converted| converted.round_dp(USD_DECIMAL_PLACES))
}

/// A source row as decoded from a partition file, before normalization.
///
/// Only known columns are kept and empty cells are treated as nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: BTreeMap<Column, String>
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        self.fields.get(&column).map(String::as_str)
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            self.fields.remove(&column);
        } else if trimmed.len() == value.len() {
            self.fields.insert(column, value);
        } else {
            self.fields.insert(column, trimmed.to_string());
        }
    }

    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }
}

fn parse_decimal(raw: &RawRecord, column: Column) -> Result<Option<Decimal>, RecordError> {
    let Some(value) = raw.get(column) else {
        return Ok(None)
    };

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map(Some)
        .map_err(|error| RecordError::invalid(column, value, error))
}

fn parse_date(raw: &RawRecord) -> Result<Option<NaiveDate>, RecordError> {
    let Some(value) = raw.get(Column::TxnDate) else {
        return Ok(None)
    };

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(timestamp.date()));
        }
    }

    Err(RecordError::invalid(Column::TxnDate, value, "expected YYYY-MM-DD"))
}

fn parse_category<T: FromStr>(raw: &RawRecord, column: Column) -> Option<T>
where
    T::Err: std::fmt::Display
{
    let value = raw.get(column)?;

    match T::from_str(value) {
        Ok(category) => Some(category),
        Err(error) => {
            debug!("Treating [{column}] as null: {error}");
            None
        }
    }
}
