use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::error;

use crate::models::Table;
use crate::types::{Channel, Column, Currency, ProductType};

/// Share of total volume above which a currency is flagged as a concentration risk.
pub const CONCENTRATION_THRESHOLD_PCT: i64 = 25;

/// Row count and summed `amount_usd` of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStat {
    pub count: usize,
    pub volume: Decimal
}

impl GroupStat {
    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        accumulate(&mut self.volume, amount);
    }

    /// Mean `amount_usd` of the group; `None` for an empty group.
    pub fn mean(&self) -> Option<Decimal> {
        mean(self.volume, self.count)
    }
}

pub type Grouped<K> = BTreeMap<K, GroupStat>;

/// Groups ordered by descending volume. Equal volumes keep key order.
pub fn ranked<K: Clone + Ord>(groups: &Grouped<K>) -> Vec<(K, GroupStat)> {
    let mut ranked: Vec<(K, GroupStat)> = groups.iter().map(|(key, stat)| (key.clone(), *stat)).collect();
    ranked.sort_by(|(_, left), (_, right)| right.volume.cmp(&left.volume));
    ranked
}

/// The group with the largest volume and its percentage of total volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopContributor {
    pub key: String,
    pub volume: Decimal,
    pub share_pct: f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyShare {
    pub currency: Currency,
    pub share_pct: f64
}

/// Headline statistics and per-dimension breakdowns of a table.
///
/// Breakdowns for optional dimensions are `None` when the table does not carry
/// the column. Statistics that are undefined on an empty table are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub total_volume: Decimal,
    pub mean_volume: Option<Decimal>,
    pub distinct_customers: usize,
    pub distinct_currencies: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub by_currency: Grouped<Currency>,
    pub by_product: Option<Grouped<ProductType>>,
    pub by_channel: Option<Grouped<Channel>>,
    pub by_country: Option<Grouped<String>>,
    pub by_date: Option<Grouped<NaiveDate>>,
    pub daily_by_currency: Option<BTreeMap<NaiveDate, BTreeMap<Currency, Decimal>>>,
    pub top_currency: Option<TopContributor>,
    pub top_product: Option<TopContributor>,
    pub concentration_risk: Vec<CurrencyShare>
}

impl Summary {
    /// The `n` merchant countries with the highest volume.
    pub fn top_countries(&self, n: usize) -> Vec<(String, GroupStat)> {
        self.by_country.as_ref()
            .map(|groups| ranked(groups).into_iter().take(n).collect())
            .unwrap_or_default()
    }

    /// Days with the highest and lowest volume. The earliest day wins ties.
    pub fn volume_extremes(&self) -> Option<(NaiveDate, NaiveDate)> {
        let days = self.by_date.as_ref()?;
        let mut entries = days.iter();
        let (first_day, first_stat) = entries.next()?;

        let (mut highest, mut lowest) = ((*first_day, first_stat.volume), (*first_day, first_stat.volume));

        for (day, stat) in entries {
            if stat.volume > highest.1 {
                highest = (*day, stat.volume);
            }

            if stat.volume < lowest.1 {
                lowest = (*day, stat.volume);
            }
        }

        Some((highest.0, lowest.0))
    }
}

/// Computes totals, grouped volumes, top contributors and concentration flags.
///
/// Never fails: an empty table yields zero totals and `None` for every undefined statistic.
pub fn summarize(table: &Table) -> Summary {
    let mut total_volume = Decimal::ZERO;
    let mut customers = BTreeSet::new();
    let mut by_currency: Grouped<Currency> = BTreeMap::new();
    let mut by_product: Grouped<ProductType> = BTreeMap::new();
    let mut by_channel: Grouped<Channel> = BTreeMap::new();
    let mut by_country: Grouped<String> = BTreeMap::new();
    let mut by_date: Grouped<NaiveDate> = BTreeMap::new();
    let mut daily_by_currency: BTreeMap<NaiveDate, BTreeMap<Currency, Decimal>> = BTreeMap::new();

    for transaction in table.iter() {
        let amount = transaction.amount_usd;
        accumulate(&mut total_volume, amount);

        by_currency.entry(transaction.currency).or_default().add(amount);

        if let Some(customer_id) = &transaction.customer_id {
            customers.insert(customer_id.as_str());
        }

        if let Some(product_type) = transaction.product_type {
            by_product.entry(product_type).or_default().add(amount);
        }

        if let Some(channel) = transaction.channel {
            by_channel.entry(channel).or_default().add(amount);
        }

        if let Some(country) = &transaction.merchant_country {
            by_country.entry(country.clone()).or_default().add(amount);
        }

        if let Some(date) = transaction.txn_date {
            by_date.entry(date).or_default().add(amount);
            accumulate(daily_by_currency.entry(date).or_default().entry(transaction.currency).or_default(), amount);
        }
    }

    let top_currency = top_contributor(&by_currency, total_volume);
    let top_product = top_contributor(&by_product, total_volume);
    let concentration_risk = concentration_risk(&by_currency, total_volume);
    let date_range = by_date.keys().next().copied().zip(by_date.keys().next_back().copied());

    Summary {
        total_count: table.len(),
        total_volume,
        mean_volume: mean(total_volume, table.len()),
        distinct_customers: customers.len(),
        distinct_currencies: by_currency.len(),
        date_range,
        by_currency,
        by_product: table.has(Column::ProductType).then_some(by_product),
        by_channel: table.has(Column::Channel).then_some(by_channel),
        by_country: table.has(Column::MerchantCountry).then_some(by_country),
        by_date: table.has(Column::TxnDate).then_some(by_date),
        daily_by_currency: table.has(Column::TxnDate).then_some(daily_by_currency),
        top_currency,
        top_product: top_product.filter(|_| table.has(Column::ProductType)),
        concentration_risk
    }
}

/// `part / total * 100`, or `None` when the total is zero.
pub fn share_pct(part: Decimal, total: Decimal) -> Option<Decimal> {
    if total.is_zero() {
        return None;
    }

    part.checked_div(total)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Adds a non-negative `amount` to a running volume, saturating at `Decimal::MAX`.
fn accumulate(volume: &mut Decimal, amount: Decimal) {
    match volume.checked_add(amount) {
        Some(sum) => *volume = sum,
        None => {
            error!("Volume overflowed adding {amount}, saturating");
            *volume = Decimal::MAX;
        }
    }
}

fn mean(volume: Decimal, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }

    volume.checked_div(Decimal::from(count))
}

fn top_contributor<K: ToString>(groups: &Grouped<K>, total: Decimal) -> Option<TopContributor> {
    let mut best: Option<(&K, &GroupStat)> = None;

    for (key, stat) in groups {
        if best.is_none_or(|(_, current)| stat.volume > current.volume) {
            best = Some((key, stat));
        }
    }

    let (key, stat) = best?;
    let share = share_pct(stat.volume, total)?;

    Some(TopContributor {
        key: key.to_string(),
        volume: stat.volume,
        share_pct: share.to_f64().unwrap_or_default()
    })
}

fn concentration_risk(by_currency: &Grouped<Currency>, total: Decimal) -> Vec<CurrencyShare> {
    let threshold = Decimal::from(CONCENTRATION_THRESHOLD_PCT);

    by_currency.iter()
        .filter_map(|(currency, stat)| {
            let share = share_pct(stat.volume, total)?;

            (share > threshold).then(|| CurrencyShare {
                currency: *currency,
                share_pct: share.to_f64().unwrap_or_default()
            })
        })
        .collect()
}
