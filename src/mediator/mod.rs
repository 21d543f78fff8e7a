//! Mediator Module
//!
//! The proxy that stands between callers and an expensive resource
//! producer. For every request it:
//!
//! 1. asks the access policy, and stops with `Outcome::Denied` on deny
//! 2. looks the key up in the result cache
//! 3. on a miss, attaches to the key's in-flight production or starts one,
//!    constructing the producer on first use
//!
//! Step 2 first runs without locks. On a miss it is repeated with `peek`
//! together with the registration half of step 3 under the in-flight
//! registry lock, so at most one production per key is ever outstanding.
//! Lock order is registry, then cache.
//!
//! Invalidating a key detaches its running production. A production
//! registered afterwards waits for the detached one to settle before it
//! invokes the producer.
//!
//! Productions run on their own tokio task. A caller that gives up only
//! stops waiting; the production still finishes and fills the cache for
//! everyone else.

mod inflight;
mod lazy;
mod outcome;
mod stats;

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::cache::{MemoryCache, ResultCache};
use crate::error::ProxyError;
use crate::events::{CacheEvent, EventBus, DEFAULT_EVENT_CAPACITY};
use crate::key::RequestKey;
use crate::policy::{AccessPolicy, Decision, Identity};
use crate::producer::ProducerFactory;

use inflight::{wait_settled, InFlightRegistry, Registration};
use lazy::LazyProducer;
use stats::MediatorCounters;

pub use outcome::{Origin, Outcome};
pub use stats::{MediatorStats, RequestCounts};

/// Builds the result cache when the mediator is created.
pub type CacheFactory<V> = Box<dyn FnOnce() -> Arc<dyn ResultCache<V>> + Send>;

// == Mediator Config ==
/// Components composed by a mediator.
pub struct MediatorConfig<V> {
    pub access_policy: Arc<dyn AccessPolicy>,
    pub cache_factory: CacheFactory<V>,
    pub producer_factory: Arc<dyn ProducerFactory<V>>,
    /// Buffer size of the cache event channel
    pub event_capacity: usize,
}

impl<V> MediatorConfig<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Config with an unbounded in-memory cache.
    pub fn new(
        access_policy: impl AccessPolicy + 'static,
        producer_factory: impl ProducerFactory<V> + 'static,
    ) -> Self {
        Self {
            access_policy: Arc::new(access_policy),
            cache_factory: Box::new(|| -> Arc<dyn ResultCache<V>> {
                Arc::new(MemoryCache::<V>::unbounded())
            }),
            producer_factory: Arc::new(producer_factory),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn with_cache_factory<F>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> Arc<dyn ResultCache<V>> + Send + 'static,
    {
        self.cache_factory = Box::new(factory);
        self
    }

    /// Uses an already built cache.
    pub fn with_cache(self, cache: Arc<dyn ResultCache<V>>) -> Self {
        self.with_cache_factory(move || cache)
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

struct Inner<V> {
    policy: Arc<dyn AccessPolicy>,
    cache: Arc<dyn ResultCache<V>>,
    producer: LazyProducer<V>,
    in_flight: Mutex<InFlightRegistry<V>>,
    counters: MediatorCounters,
    events: EventBus,
}

// == Mediator ==
/// Cheap to clone; clones share all state.
pub struct Mediator<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for Mediator<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> Mediator<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Builds the cache; the producer is left unconstructed until needed.
    pub fn new(config: MediatorConfig<V>) -> Self {
        let cache = (config.cache_factory)();

        Self {
            inner: Arc::new(Inner {
                policy: config.access_policy,
                cache,
                producer: LazyProducer::new(config.producer_factory),
                in_flight: Mutex::new(InFlightRegistry::new()),
                counters: MediatorCounters::default(),
                events: EventBus::new(config.event_capacity),
            }),
        }
    }

    // == Request ==
    /// Serves `key` for `identity`.
    ///
    /// Never panics on producer or policy failure: denial, construction
    /// failure and production failure all come back as outcome values.
    pub async fn request(&self, key: impl Into<RequestKey>, identity: &Identity) -> Outcome<V> {
        let key = key.into();
        let inner = &self.inner;
        inner.counters.record_request();

        if !inner.policy.authorize(identity, &key).is_allowed() {
            inner.counters.record_denied();
            warn!(
                role = %identity.role,
                subject = identity.subject.as_deref().unwrap_or("-"),
                "Access denied for {}",
                key
            );
            return Outcome::Denied;
        }

        if let Some(value) = inner.cache.get(&key).await {
            inner.counters.record_cache_hit();
            debug!("Cache hit for {}", key);
            return Outcome::served(value, Origin::Cached);
        }

        let (rx, origin) = {
            let mut in_flight = inner.in_flight.lock().await;

            match in_flight.attach(&key) {
                Some(rx) => {
                    inner.counters.record_joined();
                    debug!("Joining in-flight production of {}", key);
                    (rx, Origin::Joined)
                }
                None => {
                    // Stored between the lookup above and taking the lock
                    if let Some(value) = inner.cache.peek(&key).await {
                        inner.counters.record_cache_hit();
                        debug!("Cache hit for {} after settle", key);
                        return Outcome::served(value, Origin::Cached);
                    }

                    let (registration, rx) = in_flight.register(key.clone());
                    tokio::spawn(produce_and_settle(self.inner.clone(), key.clone(), registration));
                    (rx, Origin::Fresh)
                }
            }
        };

        match wait_settled(rx).await {
            Ok(value) => Outcome::served(value, origin),
            Err(err) => Outcome::Failed(err),
        }
    }

    /// Evaluates the access policy without issuing a request.
    pub fn authorize(&self, identity: &Identity, key: &RequestKey) -> Decision {
        self.inner.policy.authorize(identity, key)
    }

    // == Invalidate ==
    /// Drops the cached entry for `key`.
    ///
    /// A production of the key that is still running is detached: its
    /// waiters get its result, but the result is not cached. The next
    /// production of the key starts only after it settles.
    pub async fn invalidate(&self, key: &RequestKey) -> bool {
        let (removed, detached) = {
            let mut in_flight = self.inner.in_flight.lock().await;
            let detached = in_flight.detach(key);
            let removed = self.inner.cache.invalidate(key).await;
            (removed, detached)
        };

        if removed || detached {
            info!(removed, detached, "Invalidated {}", key);
            self.inner.events.publish(CacheEvent::Invalidated(key.clone()));
        }
        removed
    }

    /// Drops expired cache entries.
    pub async fn purge_expired(&self) -> usize {
        self.inner.cache.purge_expired().await
    }

    /// Receives `CacheEvent`s published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Number of productions currently outstanding, detached ones included.
    pub async fn in_flight(&self) -> usize {
        self.inner.in_flight.lock().await.len()
    }

    pub fn producer_ready(&self) -> bool {
        self.inner.producer.is_initialized()
    }

    pub fn cache(&self) -> Arc<dyn ResultCache<V>> {
        self.inner.cache.clone()
    }

    pub async fn stats(&self) -> MediatorStats {
        MediatorStats {
            requests: self.inner.counters.snapshot(),
            in_flight: self.in_flight().await,
            producer_ready: self.producer_ready(),
            cache: self.inner.cache.stats().await,
        }
    }
}

/// Runs one production and releases everyone waiting on it.
async fn produce_and_settle<V>(inner: Arc<Inner<V>>, key: RequestKey, registration: Registration<V>)
where
    V: Clone + Send + Sync + 'static,
{
    let Registration {
        id,
        tx,
        predecessor,
    } = registration;

    if let Some(mut predecessor) = predecessor {
        debug!("Waiting for detached production of {} to settle", key);
        let _ = predecessor.wait_for(Option::is_some).await;
    }

    info!("Cache miss for {}, starting production", key);

    let result = match inner.producer.get(&inner.counters).await {
        Ok(producer) => {
            inner.counters.record_production();
            producer
                .produce(&key)
                .await
                .map_err(|err| ProxyError::ProductionFailed {
                    key: key.to_string(),
                    reason: format!("{:#}", err),
                })
        }
        Err(err) => Err(err),
    };

    let stored = {
        let mut in_flight = inner.in_flight.lock().await;
        let owned = in_flight.complete(&key, id);

        match &result {
            Ok(value) if owned => {
                inner.cache.put(key.clone(), value.clone()).await;
                true
            }
            Ok(_) => {
                debug!("Not caching {}: invalidated while in flight", key);
                false
            }
            Err(_) => false,
        }
    };

    match &result {
        Ok(_) => info!("Production of {} complete", key),
        Err(err) => {
            if matches!(err, ProxyError::ProductionFailed { .. }) {
                inner.counters.record_production_failure();
            }
            warn!("Production of {} failed: {}", key, err);
        }
    }

    if stored {
        inner.events.publish(CacheEvent::Stored(key));
    }

    tx.send_replace(Some(result));
}
