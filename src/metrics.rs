//! Injected observability sink.
//!
//! The core never touches a global metrics registry; callers construct a sink
//! and pass it in. Emission (Prometheus, statsd, logs) lives in the boundary
//! layer.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter sink for cache and fetch activity.
pub trait MetricsSink: Send + Sync {
    fn cache_hit(&self, key: &str);
    fn cache_miss(&self, key: &str);
    fn cache_store(&self, key: &str, bytes: usize);
    fn upstream_fetch(&self, url: &str, status: u16);
}

/// Sink that discards everything. The default when callers don't care.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn cache_hit(&self, _key: &str) {}
    fn cache_miss(&self, _key: &str) {}
    fn cache_store(&self, _key: &str, _bytes: usize) {}
    fn upstream_fetch(&self, _url: &str, _status: u16) {}
}

/// Atomic counters, mainly useful in tests and debug endpoints.
#[derive(Debug, Default)]
pub struct CountingMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub stores: AtomicU64,
    pub fetches: AtomicU64,
}

impl MetricsSink for CountingMetrics {
    fn cache_hit(&self, _key: &str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn cache_miss(&self, _key: &str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn cache_store(&self, _key: &str, _bytes: usize) {
        self.stores.fetch_add(1, Ordering::Relaxed);
    }

    fn upstream_fetch(&self, _url: &str, _status: u16) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }
}

impl CountingMetrics {
    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn miss_count(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}
