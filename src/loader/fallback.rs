use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::export::{read_csv, ExportError};
use crate::generator::generate;
use crate::loader::cache::TableCache;
use crate::loader::record_loader::{load, location_of};
use crate::models::{validate_schema, SchemaError, Table};
use crate::storage::ObjectStore;

/// Where the table of a `LoadOutcome` came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    Storage {
        location: String,
        fetched_at: DateTime<Utc>
    },
    Sample {
        path: PathBuf,
        reason: String
    },
    Synthetic {
        reason: String
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: Arc<Table>,
    pub origin: DataOrigin
}

impl LoadOutcome {
    /// Why storage was not used, if the table is fallback data.
    pub fn fallback_reason(&self) -> Option<&str> {
        match &self.origin {
            DataOrigin::Storage { .. } => None,
            DataOrigin::Sample { reason, .. } | DataOrigin::Synthetic { reason } => Some(reason.as_str())
        }
    }
}

/// Loads `prefix` from `store` through the cache, falling back to sample data on any load failure.
///
/// # Errors
/// Returns `SchemaError::MissingRequiredColumn` when the resulting table lacks `currency` or `amount_usd`.
pub fn load_with_fallback(
    cache: &TableCache,
    store: &dyn ObjectStore,
    prefix: &str,
    config: &PipelineConfig
) -> Result<LoadOutcome, SchemaError> {
    let location = location_of(store, prefix);

    let outcome = match cache.get_or_load(&location, || load(store, prefix)) {
        Ok(cached) => LoadOutcome {
            table: cached.table,
            origin: DataOrigin::Storage { location, fetched_at: cached.fetched_at }
        },
        Err(error) => {
            warn!("Could not load [{location}], using sample data instead: {error}");
            fallback(config, error.to_string())
        }
    };

    validate_schema(&outcome.table)?;

    Ok(outcome)
}

fn fallback(config: &PipelineConfig, reason: String) -> LoadOutcome {
    if let Some(path) = &config.sample_path {
        match read_sample(path) {
            Ok(table) => {
                info!("Loaded {} sample rows from [{}]", table.len(), path.display());

                return LoadOutcome {
                    table: Arc::new(table),
                    origin: DataOrigin::Sample { path: path.clone(), reason }
                };
            }
            Err(error) => {
                warn!("Sample file [{}] unavailable, generating data: {error}", path.display());
            }
        }
    }

    info!("Generating {} synthetic rows with seed {}", config.fallback_rows, config.fallback_seed);

    LoadOutcome {
        table: Arc::new(generate(config.fallback_seed, config.fallback_rows)),
        origin: DataOrigin::Synthetic { reason }
    }
}

fn read_sample(path: &Path) -> Result<Table, ExportError> {
    let file = File::open(path)?;
    read_csv(BufReader::new(file))
}
