//! TTL Purge Task
//!
//! Background task that periodically removes expired cached results.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResultCache;

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs until aborted, sleeping `cleanup_interval_secs` between
/// runs. Caches without a TTL always report zero removals.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(mediator.cache(), 1);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(
    cache: Arc<dyn ResultCache<V>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL purge task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;

            if removed > 0 {
                info!("TTL purge: removed {} expired entries", removed);
            } else {
                debug!("TTL purge: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EvictionPolicy, MemoryCache};
    use crate::key::RequestKey;

    fn cache_with_ttl(ttl: Duration) -> Arc<dyn ResultCache<String>> {
        Arc::new(MemoryCache::new(EvictionPolicy::unbounded().with_ttl(ttl)))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = cache_with_ttl(Duration::from_millis(200));
        cache
            .put(RequestKey::from("expire_soon"), "value".to_string())
            .await;

        let handle = spawn_cleanup_task(cache.clone(), 1);

        // Entry expires, then the purge runs at ~1s
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.len().await, 0, "Expired entry should have been purged");
        assert_eq!(cache.stats().await.expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = cache_with_ttl(Duration::from_secs(3600));
        cache
            .put(RequestKey::from("long_lived"), "value".to_string())
            .await;

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            cache.get(&RequestKey::from("long_lived")).await,
            Some("value".to_string())
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache = cache_with_ttl(Duration::from_secs(1));

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
