//! Simulated downloader
//!
//! Stands in for a slow remote resource: construction and every request
//! take a configurable amount of time.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{ProducerFactory, ResourceProducer};
use crate::key::RequestKey;

/// Producer that returns synthetic content after a delay.
#[derive(Debug, Clone)]
pub struct SimulatedProducer {
    latency: Duration,
}

impl SimulatedProducer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Content returned for a key.
    pub fn content_for(key: &RequestKey) -> String {
        format!("content downloaded from {}", key)
    }
}

#[async_trait]
impl ResourceProducer<String> for SimulatedProducer {
    async fn produce(&self, key: &RequestKey) -> anyhow::Result<String> {
        info!("Downloading {}", key);
        tokio::time::sleep(self.latency).await;
        info!("Download of {} complete", key);
        Ok(Self::content_for(key))
    }
}

/// Factory for `SimulatedProducer`.
#[derive(Debug, Clone)]
pub struct SimulatedFactory {
    /// Time spent "connecting" before the producer is usable
    pub init_delay: Duration,
    /// Per-request latency of the built producer
    pub latency: Duration,
}

impl SimulatedFactory {
    pub fn new(init_delay: Duration, latency: Duration) -> Self {
        Self {
            init_delay,
            latency,
        }
    }
}

impl Default for SimulatedFactory {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_secs(2))
    }
}

#[async_trait]
impl ProducerFactory<String> for SimulatedFactory {
    async fn create(&self) -> anyhow::Result<Box<dyn ResourceProducer<String>>> {
        info!("Initializing simulated downloader, connecting to server...");
        tokio::time::sleep(self.init_delay).await;
        Ok(Box::new(SimulatedProducer::new(self.latency)))
    }
}
