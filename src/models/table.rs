use std::collections::BTreeSet;

use crate::models::errors::SchemaError;
use crate::models::Transaction;
use crate::types::Column;

pub const REQUIRED_COLUMNS: [Column; 2] = [Column::Currency, Column::AmountUsd];

/// The set of known columns supplied by at least one source of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet(BTreeSet<Column>);

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full() -> Self {
        Column::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, column: Column) -> bool {
        self.0.insert(column)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    pub fn extend_from(&mut self, other: &ColumnSet) {
        self.0.extend(other.iter());
    }

    /// Columns in export order.
    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|column| column.name().to_string()).collect()
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The unified, immutable table produced by one load call.
///
/// Derived views (filtered tables) are fresh values; nothing in the pipeline
/// mutates a table after it has been built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: ColumnSet,
    records: Vec<Transaction>
}

impl Table {
    pub fn new(columns: ColumnSet, records: Vec<Transaction>) -> Self {
        Self { columns, records }
    }

    /// A table with the same column set as `self` but different rows.
    pub fn with_records(&self, records: Vec<Transaction>) -> Self {
        Self { columns: self.columns.clone(), records }
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(column)
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Checks that the table carries every column the analytics depend on.
///
/// # Errors
/// Returns `SchemaError::MissingRequiredColumn` for the first required column that is absent.
pub fn validate_schema(table: &Table) -> Result<(), SchemaError> {
    match REQUIRED_COLUMNS.into_iter().find(|column| !table.has(*column)) {
        Some(column) => Err(SchemaError::MissingRequiredColumn {
            column,
            available: table.columns().names()
        }),
        None => Ok(())
    }
}
