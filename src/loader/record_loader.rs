use tracing::{debug, info};

use crate::loader::decode::{normalize_rows, PartitionFormat};
use crate::models::{ColumnSet, LoadError, Table};
use crate::storage::ObjectStore;
use crate::types::Column;

const CURRENCY_PARTITION: &str = "currency";

/// Extracts the value of a `name=value` segment from a partition path.
pub fn partition_value<'a>(key: &'a str, name: &str) -> Option<&'a str> {
    key.split('/')
        .filter_map(|segment| segment.split_once('='))
        .find(|(segment_name, value)| *segment_name == name && !value.is_empty())
        .map(|(_, value)| value)
}

/// Identifies a prefix inside a store for caching and diagnostics.
pub fn location_of(store: &dyn ObjectStore, prefix: &str) -> String {
    let location = store.location();

    if prefix.is_empty() {
        location
    } else {
        format!("{}/{}", location.trim_end_matches('/'), prefix.trim_start_matches('/'))
    }
}

/// Builds the unified table from every partition file under `prefix`.
///
/// Partitions lacking a `currency` column take it from a `currency=<CODE>` path
/// segment. Rows are concatenated in discovery order without deduplication.
///
/// # Errors
/// Returns `LoadError` if:
/// - The prefix holds no readable partition files (`NoData`).
/// - No partition supplies a currency column (`MissingCurrency`).
/// - Listing, fetching or decoding a partition fails.
pub fn load(store: &dyn ObjectStore, prefix: &str) -> Result<Table, LoadError> {
    let location = location_of(store, prefix);
    let keys = store.list_all(prefix)?;

    let mut columns = ColumnSet::new();
    let mut rows = Vec::new();
    let mut partitions = 0usize;

    for key in keys {
        let Some(format) = PartitionFormat::from_key(&key) else {
            debug!("Skipping non-partition object [{key}]");
            continue
        };

        let bytes = store.get(&key)?;
        let mut partition = format.decode(bytes).map_err(|reason| LoadError::decode(&key, reason))?;

        if !partition.columns.contains(Column::Currency) {
            if let Some(currency) = partition_value(&key, CURRENCY_PARTITION) {
                partition.fill(Column::Currency, currency);
            }
        }

        debug!("Partition [{key}] contributed {} rows", partition.rows.len());

        columns.extend_from(&partition.effective_columns());
        rows.extend(partition.rows);
        partitions += 1;
    }

    if partitions == 0 {
        return Err(LoadError::NoData { location });
    }

    if !columns.contains(Column::Currency) {
        return Err(LoadError::MissingCurrency { location });
    }

    let records = normalize_rows(rows);

    info!("Loaded {} rows from {partitions} partitions under [{location}]", records.len());

    Ok(Table::new(columns, records))
}
