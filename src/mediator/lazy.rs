//! Lazily constructed producer handle.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::stats::MediatorCounters;
use crate::error::{ProxyError, Result};
use crate::producer::{ProducerFactory, ResourceProducer};

/// Slot that stays empty until the first successful construction.
///
/// Concurrent first accessors wait on a single construction attempt. A
/// failed attempt leaves the slot empty so the next caller tries again.
pub(crate) struct LazyProducer<V> {
    factory: Arc<dyn ProducerFactory<V>>,
    cell: OnceCell<Arc<dyn ResourceProducer<V>>>,
}

impl<V> LazyProducer<V> {
    pub(crate) fn new(factory: Arc<dyn ProducerFactory<V>>) -> Self {
        Self {
            factory,
            cell: OnceCell::new(),
        }
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Returns the producer, constructing it on first use.
    pub(crate) async fn get(
        &self,
        counters: &MediatorCounters,
    ) -> Result<Arc<dyn ResourceProducer<V>>> {
        let producer = self
            .cell
            .get_or_try_init(|| async {
                counters.record_construction();
                info!("First request needing the producer, constructing it");

                match self.factory.create().await {
                    Ok(producer) => {
                        info!("Resource producer ready");
                        Ok(Arc::<dyn ResourceProducer<V>>::from(producer))
                    }
                    Err(err) => {
                        counters.record_construction_failure();
                        warn!("Producer construction failed: {:#}", err);
                        Err(ProxyError::ProducerConstructionFailed(format!("{:#}", err)))
                    }
                }
            })
            .await?;

        Ok(producer.clone())
    }
}
