use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Table;
use crate::types::{Channel, Column, Currency, ProductType};

/// The values a presentation layer can offer for each filter.
///
/// Dimensions the table does not carry are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub currencies: Vec<Currency>,
    pub product_types: Option<Vec<ProductType>>,
    pub channels: Option<Vec<Channel>>,
    pub date_bounds: Option<(NaiveDate, NaiveDate)>
}

impl FilterOptions {
    pub fn from_table(table: &Table) -> Self {
        let currencies: BTreeSet<Currency> = table.iter().map(|transaction| transaction.currency).collect();

        let product_types = table.has(Column::ProductType).then(|| {
            table.iter()
                .filter_map(|transaction| transaction.product_type)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        });

        let channels = table.has(Column::Channel).then(|| {
            table.iter()
                .filter_map(|transaction| transaction.channel)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        });

        let dates = table.iter().filter_map(|transaction| transaction.txn_date);
        let date_bounds = dates.clone().min().zip(dates.max());

        Self {
            currencies: currencies.into_iter().collect(),
            product_types,
            channels,
            date_bounds
        }
    }
}
