mod options;
#[cfg(test)]
mod tests;

use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{Table, Transaction};
use crate::types::{Channel, Column, Currency, ProductType};

pub use options::FilterOptions;

/// A categorical restriction: either every value or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T)
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether a row holding `value` passes. Null values only pass `All`.
    pub fn admits(&self, value: Option<&T>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => value == Some(expected)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            T::from_str(value).map(Selection::Only)
        }
    }
}

/// Conjunctive row filters. The default admits every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Inclusive date window.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub currency: Selection<Currency>,
    pub product_type: Selection<ProductType>,
    pub channel: Selection<Channel>
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some((start, end));
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Selection::Only(currency);
        self
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = Selection::Only(product_type);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Selection::Only(channel);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.currency.is_all() && self.product_type.is_all() && self.channel.is_all()
    }
}

/// Returns a new table holding the rows that pass every filter.
///
/// A filter on a dimension the table does not carry is skipped, so an
/// unavailable dimension never empties the table. The source is left untouched.
pub fn apply_filters(table: &Table, filters: &Filters) -> Table {
    let date_range = filters.date_range.filter(|_| active(table, Column::TxnDate, true));
    let filter_product = active(table, Column::ProductType, !filters.product_type.is_all());
    let filter_channel = active(table, Column::Channel, !filters.channel.is_all());

    let admits = |transaction: &Transaction| {
        let in_window = date_range.is_none_or(|(start, end)| {
            transaction.txn_date.is_some_and(|date| date >= start && date <= end)
        });

        in_window
            && filters.currency.admits(Some(&transaction.currency))
            && (!filter_product || filters.product_type.admits(transaction.product_type.as_ref()))
            && (!filter_channel || filters.channel.admits(transaction.channel.as_ref()))
    };

    let records: Vec<Transaction> = table.iter().filter(|transaction| admits(transaction)).cloned().collect();

    debug!("Filters kept {} of {} rows", records.len(), table.len());

    table.with_records(records)
}

fn active(table: &Table, column: Column, requested: bool) -> bool {
    if requested && !table.has(column) {
        debug!("Ignoring filter on unavailable column [{column}]");
        return false;
    }

    requested
}
