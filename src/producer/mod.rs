//! Resource Producer Module
//!
//! Producers perform the expensive operation behind the mediator. They are
//! built by a `ProducerFactory` on first use, because construction itself
//! can be slow or fail (connecting, loading credentials, ...).
//!
//! Producers are external collaborators, so their errors are opaque
//! `anyhow::Error`s; the mediator maps them onto `ProxyError`.

mod http;
mod simulated;

use async_trait::async_trait;

use crate::key::RequestKey;

pub use http::{HttpFactory, HttpProducer};
pub use simulated::{SimulatedFactory, SimulatedProducer};

// == Resource Producer Trait ==
/// Performs the actual expensive operation for a key.
#[async_trait]
pub trait ResourceProducer<V>: Send + Sync {
    async fn produce(&self, key: &RequestKey) -> anyhow::Result<V>;
}

// == Producer Factory Trait ==
/// Builds the producer. Called lazily, and again after a failed attempt.
#[async_trait]
pub trait ProducerFactory<V>: Send + Sync {
    async fn create(&self) -> anyhow::Result<Box<dyn ResourceProducer<V>>>;
}
