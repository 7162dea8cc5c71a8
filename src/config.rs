use std::path::PathBuf;
use std::time::Duration;

use crate::generator::{DEFAULT_ROWS, DEFAULT_SEED};
use crate::storage::DEFAULT_PAGE_SIZE;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const DEFAULT_CACHE_CAPACITY: u64 = 16;

/// Tunables for loading, caching and falling back to sample data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// How long a successful load is served from the cache.
    pub cache_ttl: Duration,
    /// Maximum number of locations held by the cache.
    pub cache_capacity: u64,
    pub fallback_seed: u64,
    pub fallback_rows: usize,
    /// A previously exported sample tried before generating one.
    pub sample_path: Option<PathBuf>,
    /// Keys requested per storage listing page.
    pub page_size: usize
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            fallback_seed: DEFAULT_SEED,
            fallback_rows: DEFAULT_ROWS,
            sample_path: None,
            page_size: DEFAULT_PAGE_SIZE
        }
    }
}

impl PipelineConfig {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_fallback(mut self, seed: u64, rows: usize) -> Self {
        self.fallback_seed = seed;
        self.fallback_rows = rows;
        self
    }

    pub fn with_sample_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sample_path = Some(path.into());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}
