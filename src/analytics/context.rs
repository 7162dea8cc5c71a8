use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::analytics::anomalies::{AnomalyReport, HIGH_VALUE_USD, VERY_HIGH_VALUE_USD};
use crate::analytics::summary::{GroupStat, Summary, TopContributor};

/// Builds the snapshot handed to summarization and chat collaborators.
///
/// Optional dimensions are omitted when the table does not carry them. Money
/// values are rounded to cents.
pub fn data_context(summary: &Summary, anomalies: &AnomalyReport) -> Map<String, Value> {
    let mut context = Map::new();

    context.insert("total_transactions".into(), json!(summary.total_count));
    context.insert("total_volume_usd".into(), money(summary.total_volume));
    context.insert("avg_transaction_usd".into(), summary.mean_volume.map_or(Value::Null, money));
    context.insert("unique_customers".into(), json!(summary.distinct_customers));

    insert_dimension(&mut context, "currencies", "currency_volumes", &summary.by_currency);
    context.insert("currency_counts".into(), counts(&summary.by_currency));

    if let Some(by_product) = &summary.by_product {
        insert_dimension(&mut context, "product_types", "product_volumes", by_product);
    }

    if let Some(by_channel) = &summary.by_channel {
        insert_dimension(&mut context, "channels", "channel_volumes", by_channel);
    }

    if let Some(by_country) = &summary.by_country {
        insert_dimension(&mut context, "countries", "country_volumes", by_country);
    }

    if let Some((start, end)) = summary.date_range {
        context.insert("date_range".into(), json!({ "start": start.to_string(), "end": end.to_string() }));
    }

    if let Some((highest, lowest)) = summary.volume_extremes() {
        context.insert("highest_volume_day".into(), json!(highest.to_string()));
        context.insert("lowest_volume_day".into(), json!(lowest.to_string()));
    }

    context.insert("top_currency".into(), contributor(summary.top_currency.as_ref()));
    context.insert("top_product".into(), contributor(summary.top_product.as_ref()));
    context.insert(
        "concentration_risk".into(),
        json!(summary.concentration_risk.iter().map(|share| share.currency.code()).collect::<Vec<_>>())
    );

    context.insert("high_value_transactions".into(), json!(anomalies.high_count));
    context.insert("very_high_value_transactions".into(), json!(anomalies.very_high_count));
    context.insert("anomaly_rate".into(), json!(round2(anomalies.anomaly_rate_pct)));

    let top: Vec<Value> = anomalies.top.iter()
        .map(|transaction| {
            let mut entry = json!({
                "txn_id": transaction.txn_id,
                "amount_usd": money(transaction.amount_usd),
                "currency": transaction.currency.code()
            });

            if let (Some(product), Some(object)) = (transaction.product_type, entry.as_object_mut()) {
                object.insert("product_type".into(), json!(product.code()));
            }

            entry
        })
        .collect();

    context.insert("top_5_transactions".into(), Value::Array(top));

    context
}

/// Plain-text executive summary of a summary and its anomaly report.
pub fn executive_brief(summary: &Summary, anomalies: &AnomalyReport) -> String {
    if summary.total_count == 0 {
        return "Overview: No transactions match the current filters.".to_string();
    }

    let overview = format!(
        "Overview: Processed {} transactions worth ${:.0} across {} currencies from {} unique customers.",
        summary.total_count,
        summary.total_volume,
        summary.distinct_currencies,
        summary.distinct_customers
    );

    let finding = format!(
        "Key finding: {} dominates with {} of total volume. {} is the highest-value product category at {} of volume.",
        contributor_key(summary.top_currency.as_ref()),
        contributor_share(summary.top_currency.as_ref()),
        contributor_key(summary.top_product.as_ref()),
        contributor_share(summary.top_product.as_ref())
    );

    let recommendation = if summary.concentration_risk.is_empty() {
        "Recommendation: Currency distribution is well-balanced.".to_string()
    } else {
        let currencies: Vec<&str> = summary.concentration_risk.iter().map(|share| share.currency.code()).collect();
        format!("Recommendation: High concentration risk in {}. Consider a diversification strategy.", currencies.join(", "))
    };

    let anomaly_line = format!(
        "Anomalies: {} transactions above ${HIGH_VALUE_USD} ({} above ${VERY_HIGH_VALUE_USD}), anomaly rate {:.1}%.",
        anomalies.high_count,
        anomalies.very_high_count,
        anomalies.anomaly_rate_pct
    );

    [overview, finding, recommendation, anomaly_line].join("\n")
}

fn insert_dimension<K: ToString>(context: &mut Map<String, Value>, values_key: &str, volumes_key: &str, groups: &BTreeMap<K, GroupStat>) {
    let values: Vec<String> = groups.keys().map(ToString::to_string).collect();
    let volumes: Map<String, Value> = groups.iter()
        .map(|(key, stat)| (key.to_string(), money(stat.volume)))
        .collect();

    context.insert(values_key.into(), json!(values));
    context.insert(volumes_key.into(), Value::Object(volumes));
}

fn counts<K: ToString>(groups: &BTreeMap<K, GroupStat>) -> Value {
    Value::Object(groups.iter().map(|(key, stat)| (key.to_string(), json!(stat.count))).collect())
}

fn contributor(top: Option<&TopContributor>) -> Value {
    match top {
        Some(top) => json!({ "key": top.key, "volume_usd": money(top.volume), "share_pct": round2(top.share_pct) }),
        None => json!("N/A")
    }
}

fn contributor_key(top: Option<&TopContributor>) -> &str {
    top.map_or("N/A", |top| top.key.as_str())
}

fn contributor_share(top: Option<&TopContributor>) -> String {
    top.map_or_else(|| "N/A".to_string(), |top| format!("{:.1}%", top.share_pct))
}

fn money(value: Decimal) -> Value {
    json!(value.round_dp(2).to_f64().unwrap_or_default())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
