//! Mediator statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::cache::CacheStats;

// == Request Counts ==
/// Point-in-time copy of the mediator counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestCounts {
    /// Requests received
    pub requests: u64,
    /// Requests rejected by the access policy
    pub denied: u64,
    /// Requests served from the cache
    pub cache_hits: u64,
    /// Requests that attached to an in-flight production
    pub joined: u64,
    /// Producer invocations
    pub productions: u64,
    /// Producer invocations that failed
    pub production_failures: u64,
    /// Producer construction attempts
    pub constructions: u64,
    /// Producer construction attempts that failed
    pub construction_failures: u64,
}

// == Mediator Stats ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediatorStats {
    #[serde(flatten)]
    pub requests: RequestCounts,
    /// Productions currently outstanding
    pub in_flight: usize,
    /// Whether the producer has been constructed
    pub producer_ready: bool,
    pub cache: CacheStats,
}

// == Counters ==
#[derive(Debug, Default)]
pub(crate) struct MediatorCounters {
    requests: AtomicU64,
    denied: AtomicU64,
    cache_hits: AtomicU64,
    joined: AtomicU64,
    productions: AtomicU64,
    production_failures: AtomicU64,
    constructions: AtomicU64,
    construction_failures: AtomicU64,
}

impl MediatorCounters {
    pub(crate) fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_denied(&self) {
        self.denied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_joined(&self) {
        self.joined.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_production(&self) {
        self.productions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_production_failure(&self) {
        self.production_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_construction(&self) {
        self.constructions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_construction_failure(&self) {
        self.construction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> RequestCounts {
        RequestCounts {
            requests: self.requests.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            joined: self.joined.load(Ordering::Relaxed),
            productions: self.productions.load(Ordering::Relaxed),
            production_failures: self.production_failures.load(Ordering::Relaxed),
            constructions: self.constructions.load(Ordering::Relaxed),
            construction_failures: self.construction_failures.load(Ordering::Relaxed),
        }
    }
}
