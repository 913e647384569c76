//! Content-addressed read-through cache with two TTL classes.
//!
//! The cache is the only shared mutable resource in the core. Lookups follow
//! a get-then-set pattern: a hit returns the stored value without running the
//! producer (so its side effects, including network fetches, are skipped
//! entirely); a miss runs the producer and stores the result under the TTL
//! for the requested class. Two concurrent cold requests for one key may both
//! run their producers; the upstream GETs are idempotent, so no single-flight
//! layer is applied.

mod memory;

pub use memory::MemoryStore;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::FaError;
use crate::metrics::MetricsSink;

/// Expiry class for a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Ordinary page reads.
    Short,
    /// Feed-oriented reads (`.rss` consumers poll these; they tolerate
    /// staleness in exchange for fewer upstream fetches).
    Long,
}

/// Backend failure split into the one case callers can act on.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entry exceeds the backend size limit")]
    EntryTooLarge,
    #[error("cache backend failure: {0}")]
    Backend(String),
}

/// Byte-level cache backend contract.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Read-through cache used by the fetcher (raw HTML) and the parsers (typed
/// JSON records).
pub struct Cache {
    store: Box<dyn CacheStore>,
    metrics: Arc<dyn MetricsSink>,
    short_ttl: Duration,
    long_ttl: Duration,
}

impl Cache {
    pub fn new(store: Box<dyn CacheStore>, config: &Config, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            store,
            metrics,
            short_ttl: config.short_ttl,
            long_ttl: config.long_ttl,
        }
    }

    fn ttl(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Short => self.short_ttl,
            TtlClass::Long => self.long_ttl,
        }
    }

    fn map_store_error(key: &str, err: StoreError) -> FaError {
        match err {
            StoreError::EntryTooLarge => FaError::CacheTooLarge {
                key: key.to_string(),
            },
            StoreError::Backend(message) => FaError::CacheBackend { message },
        }
    }

    /// Return the cached string for `key`, or run `producer` and store its
    /// result under the TTL for `class`.
    pub async fn get_or_set<F, Fut>(
        &self,
        key: &str,
        class: TtlClass,
        producer: F,
    ) -> Result<String, FaError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String, FaError>> + Send,
    {
        if let Some(bytes) = self
            .store
            .get(key)
            .await
            .map_err(|e| Self::map_store_error(key, e))?
        {
            tracing::debug!(key, "cache hit");
            self.metrics.cache_hit(key);
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        tracing::debug!(key, "cache miss");
        self.metrics.cache_miss(key);
        let value = producer().await?;

        self.store
            .set(key, value.clone().into_bytes(), self.ttl(class))
            .await
            .map_err(|e| Self::map_store_error(key, e))?;
        self.metrics.cache_store(key, value.len());

        Ok(value)
    }

    /// JSON-aware variant: the producer's value round-trips through
    /// `serde_json`, so parsers work in typed records while the backend holds
    /// bytes.
    pub async fn get_or_set_json<T, F, Fut>(
        &self,
        key: &str,
        class: TtlClass,
        producer: F,
    ) -> Result<T, FaError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, FaError>> + Send,
    {
        if let Some(bytes) = self
            .store
            .get(key)
            .await
            .map_err(|e| Self::map_store_error(key, e))?
        {
            tracing::debug!(key, "cache hit");
            self.metrics.cache_hit(key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::debug!(key, "cache miss");
        self.metrics.cache_miss(key);
        let value = producer().await?;

        let bytes = serde_json::to_vec(&value)?;
        let len = bytes.len();
        self.store
            .set(key, bytes, self.ttl(class))
            .await
            .map_err(|e| Self::map_store_error(key, e))?;
        self.metrics.cache_store(key, len);

        Ok(value)
    }

    /// Drop an entry so the next read refetches. Used by write actions that
    /// invalidate the record they just changed.
    pub async fn delete(&self, key: &str) -> Result<(), FaError> {
        self.store
            .delete(key)
            .await
            .map_err(|e| Self::map_store_error(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{CountingMetrics, NoopMetrics};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn test_cache(metrics: Arc<dyn MetricsSink>) -> Cache {
        Cache::new(
            Box::new(MemoryStore::new(1024)),
            &Config::for_testing(),
            metrics,
        )
    }

    #[tokio::test]
    async fn test_hit_skips_producer() {
        let cache = test_cache(Arc::new(NoopMetrics));
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_set("k", TtlClass::Short, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("produced".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "produced");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_producer_error_not_cached() {
        let cache = test_cache(Arc::new(NoopMetrics));

        let first: Result<String, FaError> = cache
            .get_or_set("k", TtlClass::Short, || async {
                Err(FaError::SystemError {
                    url: "https://example.test/".to_string(),
                })
            })
            .await;
        assert!(first.is_err());

        // A later call runs the producer again and can succeed.
        let second = cache
            .get_or_set("k", TtlClass::Short, || async { Ok("ok".to_string()) })
            .await
            .unwrap();
        assert_eq!(second, "ok");
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let cache = test_cache(Arc::new(NoopMetrics));

        let stored: Vec<u32> = cache
            .get_or_set_json("k", TtlClass::Short, || async { Ok(vec![1, 2, 3]) })
            .await
            .unwrap();
        let cached: Vec<u32> = cache
            .get_or_set_json("k", TtlClass::Short, || async { Ok(vec![9, 9, 9]) })
            .await
            .unwrap();

        assert_eq!(stored, vec![1, 2, 3]);
        assert_eq!(cached, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_oversized_value_reported() {
        let cache = Cache::new(
            Box::new(MemoryStore::new(8)),
            &Config::for_testing(),
            Arc::new(NoopMetrics),
        );

        let result = cache
            .get_or_set("k", TtlClass::Short, || async {
                Ok("a value larger than eight bytes".to_string())
            })
            .await;

        assert!(matches!(result, Err(FaError::CacheTooLarge { .. })));
    }

    #[tokio::test]
    async fn test_metrics_see_hits_and_misses() {
        let metrics = Arc::new(CountingMetrics::default());
        let cache = test_cache(metrics.clone());

        let _ = cache
            .get_or_set("k", TtlClass::Short, || async { Ok("v".to_string()) })
            .await
            .unwrap();
        let _ = cache
            .get_or_set("k", TtlClass::Short, || async { Ok("v".to_string()) })
            .await
            .unwrap();

        assert_eq!(metrics.miss_count(), 1);
        assert_eq!(metrics.hit_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_forces_refetch() {
        let cache = test_cache(Arc::new(NoopMetrics));
        let calls = AtomicU32::new(0);

        let produce = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("v".to_string())
        };
        let _ = cache.get_or_set("k", TtlClass::Short, produce).await.unwrap();
        cache.delete("k").await.unwrap();
        let _ = cache
            .get_or_set("k", TtlClass::Short, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("v".to_string())
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
