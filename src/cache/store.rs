//! Cache Store Module
//!
//! Single-threaded cache engine combining HashMap storage with optional LRU
//! bounding and TTL expiration. Shared access goes through `MemoryCache`.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::key::RequestKey;

// == Eviction Policy ==
/// Optional bounds applied by the store. Both are off by default, so no
/// entry disappears unless the caller asks for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Maximum number of entries; the least recently used one is evicted
    pub max_entries: Option<usize>,
    /// Lifetime of an entry after insertion
    pub ttl: Option<Duration>,
}

impl EvictionPolicy {
    /// No size bound and no expiry.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Zero disables the bound.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries).filter(|&n| n > 0);
        self
    }

    /// A zero TTL disables expiry.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl).filter(|ttl| !ttl.is_zero());
        self
    }
}

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<RequestKey, CacheEntry<V>>,
    /// LRU access tracker, only maintained when a size bound is set
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    policy: EvictionPolicy,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            policy,
        }
    }

    fn is_bounded(&self) -> bool {
        self.policy.max_entries.is_some()
    }

    // == Put ==
    /// Stores a value, overwriting any existing entry for the key.
    ///
    /// If the store is bounded and full, the least recently used entry is
    /// evicted first. Returns the evicted key, if any.
    pub fn put(&mut self, key: RequestKey, value: V) -> Option<RequestKey> {
        let mut evicted = None;
        let is_overwrite = self.entries.contains_key(&key);

        if let Some(max_entries) = self.policy.max_entries {
            if !is_overwrite && self.entries.len() >= max_entries {
                if let Some(oldest) = self.lru.evict_oldest() {
                    self.entries.remove(&oldest);
                    self.stats.record_eviction();
                    evicted = Some(oldest);
                }
            }
        }

        let entry = CacheEntry::new(value, self.policy.ttl);
        if self.is_bounded() {
            self.lru.touch(&key);
        }
        self.entries.insert(key, entry);

        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &RequestKey) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        if self.is_bounded() {
            self.lru.touch(key);
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Peek ==
    /// Returns the entry without touching LRU order or statistics.
    pub fn peek(&self, key: &RequestKey) -> Option<&CacheEntry<V>> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    // == Invalidate ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn invalidate(&mut self, key: &RequestKey) -> bool {
        let removed = self.remove_entry(key);
        if removed {
            self.stats.record_invalidation();
        }
        removed
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        if self.policy.ttl.is_none() {
            return 0;
        }

        let expired_keys: Vec<RequestKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &RequestKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn key(s: &str) -> RequestKey {
        RequestKey::from(s)
    }

    fn unbounded() -> CacheStore<String> {
        CacheStore::new(EvictionPolicy::unbounded())
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = unbounded();

        store.put(key("key1"), "value1".to_string());

        assert_eq!(store.get(&key("key1")), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = unbounded();
        assert_eq!(store.get(&key("nonexistent")), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = unbounded();

        store.put(key("key1"), "value1".to_string());
        store.put(key("key1"), "value2".to_string());

        assert_eq!(store.get(&key("key1")), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_invalidate() {
        let mut store = unbounded();

        store.put(key("key1"), "value1".to_string());
        assert!(store.invalidate(&key("key1")));
        assert!(!store.invalidate(&key("key1")));

        assert!(store.is_empty());
        assert_eq!(store.get(&key("key1")), None);
        assert_eq!(store.stats().invalidations, 1);
    }

    #[test]
    fn test_unbounded_store_never_evicts() {
        let mut store = unbounded();

        for i in 0..500 {
            assert_eq!(store.put(key(&format!("key{}", i)), i.to_string()), None);
        }

        assert_eq!(store.len(), 500);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(EvictionPolicy::unbounded().with_max_entries(3));

        store.put(key("key1"), "value1".to_string());
        store.put(key("key2"), "value2".to_string());
        store.put(key("key3"), "value3".to_string());

        // Full, so key1 (oldest) goes
        let evicted = store.put(key("key4"), "value4".to_string());

        assert_eq!(evicted, Some(key("key1")));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&key("key1")), None);
        assert!(store.get(&key("key2")).is_some());
        assert!(store.get(&key("key4")).is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(EvictionPolicy::unbounded().with_max_entries(3));

        store.put(key("key1"), "value1".to_string());
        store.put(key("key2"), "value2".to_string());
        store.put(key("key3"), "value3".to_string());

        store.get(&key("key1"));

        // key2 is now oldest
        store.put(key("key4"), "value4".to_string());

        assert!(store.get(&key("key1")).is_some());
        assert_eq!(store.get(&key("key2")), None);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store =
            CacheStore::new(EvictionPolicy::unbounded().with_ttl(Duration::from_millis(50)));

        store.put(key("key1"), "value1".to_string());
        assert!(store.get(&key("key1")).is_some());

        sleep(Duration::from_millis(80));

        assert_eq!(store.get(&key("key1")), None);
        assert!(store.is_empty());
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store =
            CacheStore::new(EvictionPolicy::unbounded().with_ttl(Duration::from_millis(50)));

        store.put(key("key1"), "value1".to_string());
        sleep(Duration::from_millis(80));
        store.put(key("key2"), "value2".to_string());

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&key("key2")).is_some());
    }

    #[test]
    fn test_store_peek_does_not_touch_stats() {
        let mut store = unbounded();
        store.put(key("key1"), "value1".to_string());

        assert_eq!(store.peek(&key("key1")).map(|e| e.value.as_str()), Some("value1"));
        assert!(store.peek(&key("missing")).is_none());

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_store_stats() {
        let mut store = unbounded();

        store.put(key("key1"), "value1".to_string());
        store.get(&key("key1")); // hit
        store.get(&key("nonexistent")); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_zero_bounds_disable_policy() {
        let policy = EvictionPolicy::unbounded()
            .with_max_entries(0)
            .with_ttl(Duration::ZERO);
        assert_eq!(policy, EvictionPolicy::unbounded());
    }
}
