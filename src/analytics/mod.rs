mod anomalies;
mod context;
mod summary;

pub use anomalies::{flag_anomalies, top_transactions, AnomalyReport, TopTransaction, HIGH_VALUE_USD, TOP_TRANSACTIONS, VERY_HIGH_VALUE_USD};
pub use context::{data_context, executive_brief};
pub use summary::{
    ranked, share_pct, summarize, CurrencyShare, GroupStat, Grouped, Summary, TopContributor,
    CONCENTRATION_THRESHOLD_PCT
};
