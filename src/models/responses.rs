//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::mediator::{MediatorStats, Origin, RequestCounts};

/// Response body for `GET /fetch`
#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    /// The requested key
    pub key: String,
    /// The produced or cached value
    pub value: String,
    /// Where the value came from
    pub origin: Origin,
}

impl FetchResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>, origin: Origin) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            origin,
        }
    }
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Human readable summary
    pub message: String,
    /// The key that was invalidated
    pub key: String,
    /// Whether a cached entry existed
    pub invalidated: bool,
}

impl InvalidateResponse {
    pub fn new(key: impl Into<String>, invalidated: bool) -> Self {
        let key = key.into();
        let message = if invalidated {
            format!("Key '{}' invalidated", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self {
            message,
            key,
            invalidated,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Mediator request counters
    #[serde(flatten)]
    pub requests: RequestCounts,
    /// Productions currently outstanding
    pub in_flight: usize,
    /// Whether the producer has been constructed yet
    pub producer_ready: bool,
    /// Result cache statistics
    pub cache: CacheStats,
    /// Cache hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<MediatorStats> for StatsResponse {
    fn from(stats: MediatorStats) -> Self {
        Self {
            hit_rate: stats.cache.hit_rate(),
            requests: stats.requests,
            in_flight: stats.in_flight,
            producer_ready: stats.producer_ready,
            cache: stats.cache,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Whether repeating the same request may succeed
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, retryable: bool) -> Self {
        Self {
            error: error.into(),
            retryable,
        }
    }
}
