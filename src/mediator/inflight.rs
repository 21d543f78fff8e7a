//! In-flight request registry.
//!
//! One entry per key whose production is outstanding. The production task
//! owns the `watch::Sender`; every caller for the key holds a receiver and
//! is released when the sender publishes the settled result.

use std::collections::HashMap;

use tokio::sync::watch;

use crate::error::{ProxyError, Result};
use crate::key::RequestKey;

/// Result every waiter of one production receives.
pub(crate) type Settled<V> = Result<V>;

type Slot<V> = Option<Settled<V>>;

struct InFlight<V> {
    id: u64,
    rx: watch::Receiver<Slot<V>>,
}

impl<V> InFlight<V> {
    /// The production task is gone without having completed its entry.
    fn is_abandoned(&self) -> bool {
        self.rx.has_changed().is_err()
    }
}

/// Handle held by the production task.
pub(crate) struct Registration<V> {
    pub(crate) id: u64,
    pub(crate) tx: watch::Sender<Slot<V>>,
    /// Detached production of the same key that must settle first
    pub(crate) predecessor: Option<watch::Receiver<Slot<V>>>,
}

/// Outstanding productions.
///
/// `entries` holds the production that owns each key. `detached` holds the
/// latest production cut loose by an invalidation; it still runs, so a new
/// production of the key waits for it before invoking the producer.
pub(crate) struct InFlightRegistry<V> {
    entries: HashMap<RequestKey, InFlight<V>>,
    detached: HashMap<RequestKey, InFlight<V>>,
    next_id: u64,
}

impl<V> InFlightRegistry<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            detached: HashMap::new(),
            next_id: 0,
        }
    }

    /// Returns a receiver for the key's outstanding production, if any.
    ///
    /// Entries left behind by a production task that died are dropped here
    /// so the key can be produced again.
    pub(crate) fn attach(&mut self, key: &RequestKey) -> Option<watch::Receiver<Slot<V>>> {
        match self.entries.get(key) {
            Some(entry) if entry.is_abandoned() => {
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.rx.clone()),
            None => None,
        }
    }

    /// Registers a new production for the key.
    ///
    /// If a detached production of the key is still running, the new
    /// registration carries it as predecessor.
    pub(crate) fn register(&mut self, key: RequestKey) -> (Registration<V>, watch::Receiver<Slot<V>>) {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let predecessor = match self.detached.get(&key) {
            Some(entry) if entry.is_abandoned() => {
                self.detached.remove(&key);
                None
            }
            Some(entry) => Some(entry.rx.clone()),
            None => None,
        };

        let (tx, rx) = watch::channel(None);
        self.entries.insert(
            key,
            InFlight {
                id,
                rx: rx.clone(),
            },
        );
        (
            Registration {
                id,
                tx,
                predecessor,
            },
            rx,
        )
    }

    /// Removes the bookkeeping of production `id`.
    ///
    /// Returns true if the production still owned the key, false when it
    /// was detached (for example by an invalidation) while running.
    pub(crate) fn complete(&mut self, key: &RequestKey, id: u64) -> bool {
        if matches!(self.entries.get(key), Some(entry) if entry.id == id) {
            self.entries.remove(key);
            return true;
        }
        if matches!(self.detached.get(key), Some(entry) if entry.id == id) {
            self.detached.remove(key);
        }
        false
    }

    /// Detaches the key's production: its waiters still get the result, but
    /// the production no longer owns the key.
    pub(crate) fn detach(&mut self, key: &RequestKey) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.detached.insert(key.clone(), entry);
                true
            }
            None => false,
        }
    }

    /// Productions still running, attached or detached.
    pub(crate) fn len(&self) -> usize {
        self.entries.len() + self.detached.len()
    }
}

/// Waits until the production settles and returns its result.
pub(crate) async fn wait_settled<V: Clone>(mut rx: watch::Receiver<Slot<V>>) -> Settled<V> {
    let settled = match rx.wait_for(Option::is_some).await {
        Ok(slot) => slot.clone(),
        Err(_) => None,
    };

    settled.unwrap_or_else(|| {
        Err(ProxyError::Internal(
            "production task ended without a result".to_string(),
        ))
    })
}
