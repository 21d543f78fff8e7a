//! Cache Module
//!
//! Result cache used by the mediator: the `ResultCache` contract, plus an
//! in-memory implementation with optional LRU bounding and TTL expiration.

mod entry;
mod lru;
mod memory;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use async_trait::async_trait;

use crate::key::RequestKey;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use memory::MemoryCache;
pub use stats::CacheStats;
pub use store::{CacheStore, EvictionPolicy};

// == Result Cache Trait ==
/// Stores successfully produced results keyed by request key.
///
/// Implementations must be safe to call concurrently from many in-flight
/// requests. Failures are never stored.
#[async_trait]
pub trait ResultCache<V>: Send + Sync {
    /// Returns the cached value, if any.
    async fn get(&self, key: &RequestKey) -> Option<V>;

    /// Like `get`, but leaves statistics and recency untouched.
    async fn peek(&self, key: &RequestKey) -> Option<V>;

    /// Stores a value, overwriting any existing entry for the key.
    async fn put(&self, key: RequestKey, value: V);

    /// Removes the entry for the key. Returns whether one was present.
    async fn invalidate(&self, key: &RequestKey) -> bool;

    /// Drops entries whose TTL has elapsed. Caches without expiry return 0.
    async fn purge_expired(&self) -> usize {
        0
    }

    async fn len(&self) -> usize;

    async fn stats(&self) -> CacheStats;
}
