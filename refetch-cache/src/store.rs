use crate::{CacheEntry, CacheError};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

/// Read/write contract every cache backend must implement.
///
/// Backends are shared between concurrent fetches, so they have to
/// tolerate concurrent `get`/`set` on the same key. Last writer wins.
#[async_trait]
pub trait CacheStore<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Return the entry stored under `key` if it is still fresh.
    ///
    /// Reading an expired entry deletes it and returns `None`.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry<T>>, CacheError>;

    /// Store `value` under `key`, replacing any previous entry. The expiry
    /// is computed from the moment of the write.
    async fn set(&self, key: &str, value: T, ttl: Duration)
    -> Result<(), CacheError>;

    /// Remove entry from cache. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Number of stored entries, stale ones included until they are read.
    async fn len(&self) -> Result<usize, CacheError>;
}

pub type AbstractCacheStore<T> = Arc<dyn CacheStore<T> + Send + Sync>;
