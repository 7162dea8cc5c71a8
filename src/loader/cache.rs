use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::models::{LoadError, Table};

/// A successfully loaded table and the moment it was fetched.
#[derive(Debug, Clone)]
pub struct CachedTable {
    pub table: Arc<Table>,
    pub fetched_at: DateTime<Utc>
}

/// Time-bounded cache of unified tables keyed by location.
///
/// Entries expire `ttl` after they were fetched. Callers racing on the same
/// location share one load, and failed loads are never stored.
pub struct TableCache {
    entries: Cache<String, CachedTable>
}

impl TableCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build()
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.cache_ttl, config.cache_capacity)
    }

    pub fn get(&self, location: &str) -> Option<CachedTable> {
        self.entries.get(location)
    }

    /// Returns the cached table for `location`, running `fetch` only when no fresh entry exists.
    pub fn get_or_load<F>(&self, location: &str, fetch: F) -> Result<CachedTable, Arc<LoadError>>
    where
        F: FnOnce() -> Result<Table, LoadError>
    {
        if let Some(cached) = self.entries.get(location) {
            debug!("Cache hit for [{location}] fetched at {}", cached.fetched_at);
            return Ok(cached);
        }

        debug!("Cache miss for [{location}]");

        self.entries.try_get_with(location.to_string(), || {
            fetch().map(|table| CachedTable {
                table: Arc::new(table),
                fetched_at: Utc::now()
            })
        })
    }
}
