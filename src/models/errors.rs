use rust_decimal::Decimal;

use crate::storage::StoreError;
use crate::types::Column;
use thiserror::Error;

/// Failures of a single load call. Every variant is recoverable by falling back to sample data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No partition files found under [{location}]")]
    NoData {
        location: String
    },
    #[error("Currency column missing from every partition under [{location}]")]
    MissingCurrency {
        location: String
    },
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
    #[error("Partition [{key}] could not be decoded: {reason}")]
    Decode {
        key: String,
        reason: String
    }
}

impl LoadError {
    pub fn decode(key: &str, reason: impl ToString) -> Self {
        Self::Decode { key: key.to_string(), reason: reason.to_string() }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Missing required column [{column}]. Available: {available:?}")]
    MissingRequiredColumn {
        column: Column,
        available: Vec<String>
    }
}

/// Why a decoded row could not become a `Transaction`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Field [{column}] is required")]
    MissingField {
        column: Column
    },
    #[error("Field [{column}] has an invalid value [{value}]: {reason}")]
    InvalidValue {
        column: Column,
        value: String,
        reason: String
    },
    #[error("Field [{column}] must not be negative, got [{value}]")]
    Negative {
        column: Column,
        value: String
    },
    #[error("Field [{column}] overflowed: {amount} * {fx_rate}")]
    Overflow {
        column: Column,
        amount: Decimal,
        fx_rate: Decimal
    }
}

impl RecordError {
    pub fn missing(column: Column) -> Self {
        Self::MissingField { column }
    }

    pub fn invalid(column: Column, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue { column, value: value.to_string(), reason: reason.to_string() }
    }

    pub fn negative(column: Column, value: &str) -> Self {
        Self::Negative { column, value: value.to_string() }
    }

    pub fn overflow(amount: Decimal, fx_rate: Decimal) -> Self {
        Self::Overflow { column: Column::AmountUsd, amount, fx_rate }
    }
}
