use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Table, Transaction};
use crate::types::{Currency, ProductType};

pub const HIGH_VALUE_USD: i64 = 50_000;
pub const VERY_HIGH_VALUE_USD: i64 = 100_000;
pub const TOP_TRANSACTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopTransaction {
    pub txn_id: String,
    pub amount_usd: Decimal,
    pub currency: Currency,
    pub product_type: Option<ProductType>
}

impl From<&Transaction> for TopTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            txn_id: transaction.txn_id.clone(),
            amount_usd: transaction.amount_usd,
            currency: transaction.currency,
            product_type: transaction.product_type
        }
    }
}

/// Counts of transactions above the fixed USD thresholds, plus the largest transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    /// Rows with `amount_usd` strictly above `HIGH_VALUE_USD`.
    pub high_count: usize,
    /// Rows with `amount_usd` strictly above `VERY_HIGH_VALUE_USD`.
    pub very_high_count: usize,
    pub total: usize,
    /// `high_count / total * 100`, defined as 0 for an empty table.
    pub anomaly_rate_pct: f64,
    pub top: Vec<TopTransaction>
}

pub fn flag_anomalies(table: &Table) -> AnomalyReport {
    let high = Decimal::from(HIGH_VALUE_USD);
    let very_high = Decimal::from(VERY_HIGH_VALUE_USD);

    let high_count = table.iter().filter(|transaction| transaction.amount_usd > high).count();
    let very_high_count = table.iter().filter(|transaction| transaction.amount_usd > very_high).count();
    let total = table.len();

    let anomaly_rate_pct = if total == 0 {
        0.0
    } else {
        high_count as f64 / total as f64 * 100.0
    };

    AnomalyReport {
        high_count,
        very_high_count,
        total,
        anomaly_rate_pct,
        top: top_transactions(table, TOP_TRANSACTIONS)
    }
}

/// The `n` largest transactions by `amount_usd`. Ties keep their table order.
pub fn top_transactions(table: &Table, n: usize) -> Vec<TopTransaction> {
    let mut ranked: Vec<&Transaction> = table.iter().collect();
    ranked.sort_by(|left, right| right.amount_usd.cmp(&left.amount_usd));

    ranked.into_iter().take(n).map(TopTransaction::from).collect()
}
