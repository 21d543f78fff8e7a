//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store invariants over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{CacheStore, EvictionPolicy};
use crate::key::RequestKey;

// == Strategies ==
/// Generates request keys shaped like resource URLs
fn key_strategy() -> impl Strategy<Value = RequestKey> {
    "[a-z]{1,8}(/[a-zA-Z0-9_]{1,12}){0,3}"
        .prop_map(|path| RequestKey::from(format!("https://example.com/{}", path)))
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: RequestKey, value: String },
    Get { key: RequestKey },
    Invalidate { key: RequestKey },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses reported by stats match what callers observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(EvictionPolicy::unbounded());
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;
        let mut expected_invalidations: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    store.put(key, value);
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Invalidate { key } => {
                    if store.invalidate(&key) {
                        expected_invalidations += 1;
                    }
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.invalidations, expected_invalidations, "Invalidations mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // Equal keys produce equal hits, even when built from separate allocations.
    #[test]
    fn prop_equal_keys_hit(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(EvictionPolicy::unbounded());
        store.put(key.clone(), value.clone());

        let rebuilt = RequestKey::from(key.as_str().to_string());
        prop_assert_eq!(store.get(&rebuilt), Some(value));
    }

    // After invalidation a lookup misses.
    #[test]
    fn prop_invalidate_removes_entry(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(EvictionPolicy::unbounded());
        store.put(key.clone(), value);

        prop_assert!(store.invalidate(&key));
        prop_assert!(store.get(&key).is_none(), "Key should not exist after invalidate");
    }

    // A second put for a key replaces the first.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = CacheStore::new(EvictionPolicy::unbounded());
        store.put(key.clone(), value1);
        store.put(key.clone(), value2.clone());

        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.len(), 1);
    }

    // A bounded store never holds more than its bound.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let mut store = CacheStore::new(EvictionPolicy::unbounded().with_max_entries(max_entries));

        for (key, value) in entries {
            store.put(key, value);
            prop_assert!(
                store.len() <= max_entries,
                "Cache size {} exceeds max {}",
                store.len(),
                max_entries
            );
        }
    }

    // Without an eviction policy nothing is ever dropped.
    #[test]
    fn prop_unbounded_keeps_everything(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let mut store = CacheStore::new(EvictionPolicy::unbounded());
        let mut distinct = HashSet::new();

        for (key, value) in entries {
            distinct.insert(key.clone());
            store.put(key, value);
        }

        prop_assert_eq!(store.len(), distinct.len());
        for key in &distinct {
            prop_assert!(store.get(key).is_some());
        }
        prop_assert_eq!(store.stats().evictions, 0);
    }

    // The most recently inserted key survives eviction.
    #[test]
    fn prop_lru_keeps_most_recent(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 2..100)
    ) {
        let mut store = CacheStore::new(EvictionPolicy::unbounded().with_max_entries(1));
        let (last_key, last_value) = entries.last().cloned().unwrap();

        for (key, value) in entries {
            store.put(key, value);
        }

        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(store.get(&last_key), Some(last_value));
    }
}

// Fewer cases for the time-sensitive TTL property
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let mut store =
            CacheStore::new(EvictionPolicy::unbounded().with_ttl(Duration::from_millis(40)));
        store.put(key.clone(), value.clone());

        prop_assert_eq!(store.get(&key), Some(value), "Value should match before expiration");

        sleep(Duration::from_millis(70));

        prop_assert!(store.get(&key).is_none(), "Entry should not be found after TTL expires");
    }
}
