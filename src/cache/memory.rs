//! In-memory result cache shared between concurrent requests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, EvictionPolicy, ResultCache};
use crate::key::RequestKey;

/// `CacheStore` behind an async RwLock.
///
/// Lookups take the write lock because they update LRU order and stats.
#[derive(Debug)]
pub struct MemoryCache<V> {
    store: RwLock<CacheStore<V>>,
}

impl<V: Clone> MemoryCache<V> {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            store: RwLock::new(CacheStore::new(policy)),
        }
    }

    /// Cache that never evicts or expires anything.
    pub fn unbounded() -> Self {
        Self::new(EvictionPolicy::unbounded())
    }
}

impl<V: Clone> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[async_trait]
impl<V> ResultCache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &RequestKey) -> Option<V> {
        self.store.write().await.get(key)
    }

    async fn peek(&self, key: &RequestKey) -> Option<V> {
        self.store
            .read()
            .await
            .peek(key)
            .map(|entry| entry.value.clone())
    }

    async fn put(&self, key: RequestKey, value: V) {
        let evicted = self.store.write().await.put(key, value);
        if let Some(evicted) = evicted {
            debug!("LRU evicted key {}", evicted);
        }
    }

    async fn invalidate(&self, key: &RequestKey) -> bool {
        self.store.write().await.invalidate(key)
    }

    async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }

    async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}
