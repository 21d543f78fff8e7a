//! HTTP producer
//!
//! Treats each request key as an absolute URL and downloads its body.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info};

use super::{ProducerFactory, ResourceProducer};
use crate::key::RequestKey;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shortest request timeout the client is built with
const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Downloads resources over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpProducer {
    client: Client,
}

impl HttpProducer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceProducer<String> for HttpProducer {
    async fn produce(&self, key: &RequestKey) -> anyhow::Result<String> {
        let url = Url::parse(key.as_str())
            .with_context(|| format!("request key is not an absolute URL: {}", key))?;

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("request failed")?
            .error_for_status()
            .context("upstream returned an error status")?;

        let body = response.text().await.context("failed to read response body")?;
        debug!("Fetched {} bytes from {}", body.len(), key);
        Ok(body)
    }
}

/// Builds the shared HTTP client on first use.
#[derive(Debug, Clone)]
pub struct HttpFactory {
    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpFactory {
    /// Timeouts below one second are raised to one second.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: timeout.max(MIN_TIMEOUT),
        }
    }
}

impl Default for HttpFactory {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl ProducerFactory<String> for HttpFactory {
    async fn create(&self) -> anyhow::Result<Box<dyn ResourceProducer<String>>> {
        info!("Building HTTP client (timeout {:?})", self.timeout);
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Box::new(HttpProducer::new(client)))
    }
}
