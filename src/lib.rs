//! Loading, filtering and summarizing FX-normalized transaction data.
//!
//! Partitioned CSV (or Parquet, behind the `parquet` feature) is read from an
//! [`storage::ObjectStore`] into a typed [`models::Table`], cached for a bounded
//! time, and replaced by deterministic synthetic data whenever storage cannot
//! serve it.

pub mod analytics;
pub mod config;
pub mod export;
pub mod filters;
pub mod generator;
pub mod loader;
pub mod models;
pub mod storage;
pub mod types;

pub use analytics::{data_context, executive_brief, flag_anomalies, summarize, AnomalyReport, Summary};
pub use config::PipelineConfig;
pub use export::{read_csv, to_csv_bytes, write_csv, ExportError};
pub use filters::{apply_filters, FilterOptions, Filters, Selection};
pub use generator::{generate, write_sample};
pub use loader::{load, load_with_fallback, DataOrigin, LoadOutcome, TableCache};
pub use models::{validate_schema, LoadError, SchemaError, Table, Transaction};
pub use storage::{LocalStore, ObjectStore, StoreError};
