//! In-memory implementation of the CacheStore trait. Entries live in a
//! mutex-guarded hashmap with no size bound: they disappear only when an
//! expired entry is read or when a key is deleted explicitly.
use crate::{CacheEntry, CacheError, CacheStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

pub struct InMemoryCache<T> {
    hashmap: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T> InMemoryCache<T> {
    pub fn new() -> Self {
        Self {
            hashmap: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Default for InMemoryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> CacheStore<T> for InMemoryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<CacheEntry<T>>, CacheError> {
        let mut hashmap = self
            .hashmap
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;

        let fresh = match hashmap.get(key) {
            None => return Ok(None),
            Some(entry) => entry.is_fresh_at(Utc::now()),
        };

        if fresh {
            Ok(hashmap.get(key).cloned())
        } else {
            hashmap.remove(key);
            debug!("Evicted expired cache entry: {}", key);
            Ok(None)
        }
    }

    async fn set(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry::new(value, ttl, Utc::now());
        let mut hashmap = self
            .hashmap
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        hashmap.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut hashmap = self
            .hashmap
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        hashmap.remove(key);
        Ok(())
    }

    async fn len(&self) -> Result<usize, CacheError> {
        let hashmap = self
            .hashmap
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        Ok(hashmap.len())
    }
}

impl<T> std::fmt::Debug for InMemoryCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.hashmap.lock().map(|h| h.len()).unwrap_or_default();
        f.debug_struct("InMemoryCache")
            .field("hashmap_size", &size)
            .finish()
    }
}
