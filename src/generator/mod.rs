mod synthetic;
#[cfg(test)]
mod tests;

use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::Path;

use crate::export::{write_csv, ExportError};
use crate::models::Table;

pub use synthetic::{base_fx_rate, generate, GeneratorConfig, SyntheticGenerator, DEFAULT_DAYS, DEFAULT_ROWS, DEFAULT_SEED, DEFAULT_START_DATE};

/// Generates a sample table and persists it as CSV at `path`, creating parent directories.
pub fn write_sample(path: &Path, seed: u64, rows: usize) -> Result<Table, ExportError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let table = generate(seed, rows);
    let mut writer = BufWriter::new(File::create(path)?);
    write_csv(&table, &mut writer)?;

    Ok(table)
}
