use std::io::Read;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, error, warn};

use crate::models::{ColumnSet, RawRecord, Transaction};
use crate::types::Column;

/// File formats a partition may be stored in, resolved from the object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionFormat {
    Csv,
    #[cfg(feature = "parquet")]
    Parquet
}

impl PartitionFormat {
    pub fn from_key(key: &str) -> Option<Self> {
        let lowered = key.to_ascii_lowercase();

        if lowered.ends_with(".csv") {
            return Some(PartitionFormat::Csv);
        }

        #[cfg(feature = "parquet")]
        {
            if lowered.ends_with(".parquet") {
                return Some(PartitionFormat::Parquet);
            }
        }

        None
    }

    pub fn decode(&self, bytes: Vec<u8>) -> Result<DecodedPartition, String> {
        match self {
            PartitionFormat::Csv => decode_csv(bytes.as_slice()).map_err(|error| error.to_string()),
            #[cfg(feature = "parquet")]
            PartitionFormat::Parquet => parquet_format::decode_parquet(bytes).map_err(|error| error.to_string())
        }
    }
}

/// The rows of one partition file with the known columns its schema declared.
#[derive(Debug, Clone, Default)]
pub struct DecodedPartition {
    pub columns: ColumnSet,
    pub rows: Vec<RawRecord>
}

impl DecodedPartition {
    /// Assigns a constant to `column` on every row and marks the column as present.
    pub fn fill(&mut self, column: Column, value: &str) {
        for row in self.rows.iter_mut() {
            row.set(column, value);
        }

        self.columns.insert(column);
    }

    /// `amount_usd` counts as present when it can be derived from `amount` and `fx_rate`.
    pub fn effective_columns(&self) -> ColumnSet {
        let mut columns = self.columns.clone();

        if columns.contains(Column::Amount) && columns.contains(Column::FxRate) {
            columns.insert(Column::AmountUsd);
        }

        columns
    }
}

/// Reads a headered CSV partition. Unknown columns are ignored and short rows leave trailing columns null.
pub fn decode_csv<R: Read>(input: R) -> Result<DecodedPartition, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);

    let mapping: Vec<Option<Column>> = reader.headers()?
        .iter()
        .map(Column::from_header)
        .collect();

    let columns = mapping.iter().flatten().copied().collect();
    let mut rows = Vec::new();

    for result in reader.records() {
        match result {
            Ok(record) => {
                let mut raw = RawRecord::new();

                for (column, value) in mapping.iter().zip(record.iter()) {
                    if let Some(column) = column {
                        raw.set(*column, value);
                    }
                }

                rows.push(raw);
            }
            Err(error) => {
                error!("CSV row could not be read: {error}");
            }
        }
    }

    Ok(DecodedPartition { columns, rows })
}

/// Normalizes decoded rows, dropping those that violate the record invariants.
pub fn normalize_rows(rows: Vec<RawRecord>) -> Vec<Transaction> {
    let total = rows.len();
    let mut dropped = 0usize;

    let records: Vec<Transaction> = rows.iter()
        .filter_map(|raw| match Transaction::from_raw(raw) {
            Ok(transaction) => Some(transaction),
            Err(error) => {
                debug!("Dropping row: {error}");
                dropped += 1;
                None
            }
        })
        .collect();

    if dropped > 0 {
        warn!("Dropped {dropped} of {total} rows that failed normalization");
    }

    records
}

#[cfg(feature = "parquet")]
mod parquet_format {
    use bytes::Bytes;
    use chrono::DateTime;
    use parquet::errors::ParquetError;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use parquet::record::Field;

    use super::DecodedPartition;
    use crate::models::{ColumnSet, RawRecord};
    use crate::types::Column;

    pub fn decode_parquet(bytes: Vec<u8>) -> Result<DecodedPartition, ParquetError> {
        let reader = SerializedFileReader::new(Bytes::from(bytes))?;

        let columns: ColumnSet = reader.metadata()
            .file_metadata()
            .schema_descr()
            .columns()
            .iter()
            .filter_map(|descriptor| Column::from_header(descriptor.name()))
            .collect();

        let mut rows = Vec::new();

        for row in reader.get_row_iter(None)? {
            let row = row?;
            let mut raw = RawRecord::new();

            for (name, field) in row.get_column_iter() {
                if let (Some(column), Some(value)) = (Column::from_header(name), field_text(field)) {
                    raw.set(column, value);
                }
            }

            rows.push(raw);
        }

        Ok(DecodedPartition { columns, rows })
    }

    fn field_text(field: &Field) -> Option<String> {
        match field {
            Field::Null => None,
            Field::Str(value) => Some(value.clone()),
            Field::Bool(value) => Some(value.to_string()),
            Field::Byte(value) => Some(value.to_string()),
            Field::Short(value) => Some(value.to_string()),
            Field::Int(value) => Some(value.to_string()),
            Field::Long(value) => Some(value.to_string()),
            Field::UByte(value) => Some(value.to_string()),
            Field::UShort(value) => Some(value.to_string()),
            Field::UInt(value) => Some(value.to_string()),
            Field::ULong(value) => Some(value.to_string()),
            Field::Float(value) => Some(value.to_string()),
            Field::Double(value) => Some(value.to_string()),
            Field::Date(days) => DateTime::from_timestamp(i64::from(*days) * 86_400, 0)
                .map(|timestamp| timestamp.date_naive().to_string()),
            Field::TimestampMillis(millis) => DateTime::from_timestamp_millis(*millis)
                .map(|timestamp| timestamp.date_naive().to_string()),
            Field::TimestampMicros(micros) => DateTime::from_timestamp_micros(*micros)
                .map(|timestamp| timestamp.date_naive().to_string()),
            _ => None
        }
    }
}
