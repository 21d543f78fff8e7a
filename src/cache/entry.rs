//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with optional TTL.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A materialized result plus its metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was inserted
    pub inserted_at: DateTime<Utc>,
    /// Expiration time, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry inserted now with an optional TTL.
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        Self::inserted_at(value, Utc::now(), ttl)
    }

    /// Creates an entry with an explicit insertion time.
    ///
    /// A TTL too large to represent is treated as no expiration.
    pub fn inserted_at(value: V, inserted_at: DateTime<Utc>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| inserted_at.checked_add_signed(ttl));

        Self {
            value,
            inserted_at,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal
    /// to its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
