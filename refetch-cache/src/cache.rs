use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached value together with its absolute expiry time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub value: T,
    /// Moment after which the entry is stale
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Build an entry that expires `ttl` after `now`.
    pub fn new(value: T, ttl: Duration, now: DateTime<Utc>) -> Self {
        // Out-of-range ttls saturate to the far future.
        let ttl = ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX);
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { value, expires_at }
    }

    /// An entry is valid up to and including its expiry instant.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }
}
