//! In-memory cache backend with per-entry deadlines.
//!
//! No eviction policy beyond TTL expiry: entries disappear when read after
//! their deadline. Suitable for a single-process deployment; a shared backend
//! can replace it behind [`CacheStore`](super::CacheStore).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{CacheStore, StoreError};

struct Entry {
    bytes: Vec<u8>,
    deadline: Instant,
}

/// RwLock-guarded map with a configurable per-entry size cap.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    max_entry_bytes: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new(max_entry_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entry_bytes,
        }
    }

    /// Number of live (unexpired) entries. Test and debug aid.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .unwrap()
            .values()
            .filter(|e| e.deadline > now)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let expired = {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if entry.deadline > Instant::now() => {
                    return Ok(Some(entry.bytes.clone()));
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.entries.write().unwrap().remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        if value.len() > self.max_entry_bytes {
            return Err(StoreError::EntryTooLarge);
        }
        let entry = Entry {
            bytes: value,
            deadline: Instant::now() + ttl,
        };
        self.entries.write().unwrap().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new(1024);
        store
            .set("k", b"value".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent() {
        let store = MemoryStore::new(1024);
        store
            .set("k", b"value".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_entry_rejected() {
        let store = MemoryStore::new(4);
        let result = store
            .set("k", b"too large".to_vec(), Duration::from_secs(60))
            .await;

        assert!(matches!(result, Err(StoreError::EntryTooLarge)));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new(1024);
        store
            .set("k", b"value".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
