//! Response cache stores for refetch.
//!
//! This crate defines the read/write contract shared by all cache backends
//! (`CacheStore`) and ships an unbounded in-process backend
//! (`InMemoryCache`). Entries carry an absolute expiry and are evicted
//! lazily when a stale entry is read.

mod cache;
mod error;
mod memory;
mod store;

pub use cache::CacheEntry;
pub use error::CacheError;
pub use memory::InMemoryCache;
pub use store::{AbstractCacheStore, CacheStore};
