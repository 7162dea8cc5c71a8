mod errors;

use std::io::{Read, Write};

use csv::WriterBuilder;

use crate::loader::{decode_csv, normalize_rows};
use crate::models::{Table, Transaction};
use crate::types::Column;

pub use errors::ExportError;

/// Writes the table as UTF-8 CSV with a header row of its present columns, in canonical order.
pub fn write_csv<W: Write>(table: &Table, output: W) -> Result<(), ExportError> {
    let columns: Vec<Column> = table.columns().iter().collect();
    let mut writer = WriterBuilder::new().from_writer(output);

    writer.write_record(columns.iter().map(|column| column.name()))?;

    for transaction in table.iter() {
        writer.write_record(columns.iter().map(|column| transaction.field(*column)))?;
    }

    writer.flush()?;

    Ok(())
}

pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(buffer)
}

/// Reads a CSV export back into a table using the same normalization as partition loading.
pub fn read_csv<R: Read>(input: R) -> Result<Table, ExportError> {
    let partition = decode_csv(input)?;
    let columns = partition.effective_columns();
    let records: Vec<Transaction> = normalize_rows(partition.rows);

    Ok(Table::new(columns, records))
}
