//! Top-level handle wiring the fetcher and cache together.

use std::sync::Arc;

use crate::cache::{Cache, CacheStore, MemoryStore};
use crate::config::Config;
use crate::fetch::Fetcher;
use crate::metrics::{MetricsSink, NoopMetrics};

/// Shared handle the boundary layer constructs once and clones per request
/// (via `Arc`). Holds the only shared mutable resource — the cache — plus the
/// fetcher and configuration.
pub struct FaClient {
    pub config: Config,
    pub cache: Cache,
    pub fetcher: Fetcher,
}

impl FaClient {
    /// Build a client over an explicit cache backend and metrics sink.
    #[must_use]
    pub fn new(config: Config, store: Box<dyn CacheStore>, metrics: Arc<dyn MetricsSink>) -> Self {
        let cache = Cache::new(store, &config, metrics.clone());
        let fetcher = Fetcher::new(&config, metrics);
        Self {
            config,
            cache,
            fetcher,
        }
    }

    /// Build a client with the in-memory backend and no metrics.
    #[must_use]
    pub fn with_defaults(config: Config) -> Self {
        let store = Box::new(MemoryStore::new(config.max_cache_entry_bytes));
        Self::new(config, store, Arc::new(NoopMetrics))
    }
}
