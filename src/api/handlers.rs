//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};

use crate::cache::{MemoryCache, ResultCache};
use crate::config::{Config, ProducerKind};
use crate::error::{ProxyError, Result};
use crate::events::DEFAULT_EVENT_CAPACITY;
use crate::mediator::{Mediator, MediatorConfig};
use crate::models::{FetchResponse, HealthResponse, InvalidateResponse, KeyQuery, StatsResponse};
use crate::policy::{AccessPolicy, AllowAll, Identity, Role, RoleAllowList};
use crate::producer::{HttpFactory, ProducerFactory, SimulatedFactory};

/// Header carrying the caller role (`admin` or `guest`)
pub const ROLE_HEADER: &str = "x-role";
/// Header carrying an optional caller name
pub const SUBJECT_HEADER: &str = "x-subject";

/// Simulated connection setup time
const SIMULATED_INIT_DELAY: Duration = Duration::from_millis(100);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub mediator: Mediator<String>,
}

impl AppState {
    pub fn new(mediator: Mediator<String>) -> Self {
        Self { mediator }
    }

    /// Composes policy, cache and producer factory from configuration.
    ///
    /// The producer itself is not constructed here; that happens on the
    /// first request that misses the cache.
    pub fn from_config(config: &Config) -> Self {
        let policy: Arc<dyn AccessPolicy> = match &config.allowed_roles {
            Some(roles) => Arc::new(RoleAllowList::new(roles.iter().copied())),
            None => Arc::new(AllowAll),
        };

        let producer_factory: Arc<dyn ProducerFactory<String>> = match config.producer {
            ProducerKind::Simulated => Arc::new(SimulatedFactory::new(
                SIMULATED_INIT_DELAY,
                Duration::from_millis(config.producer_delay_ms),
            )),
            ProducerKind::Http => {
                Arc::new(HttpFactory::new(Duration::from_secs(config.http_timeout)))
            }
        };

        let eviction = config.eviction_policy();
        let mediator = Mediator::new(MediatorConfig {
            access_policy: policy,
            cache_factory: Box::new(move || -> Arc<dyn ResultCache<String>> {
                Arc::new(MemoryCache::new(eviction))
            }),
            producer_factory,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        });

        Self::new(mediator)
    }
}

/// Reads the caller identity from request headers. No role header means guest.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<Identity> {
    let role = match headers.get(ROLE_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| ProxyError::InvalidRequest("Role header is not valid text".to_string()))?
            .parse::<Role>()?,
        None => Role::Guest,
    };

    let mut identity = Identity::new(role);
    if let Some(subject) = headers.get(SUBJECT_HEADER).and_then(|v| v.to_str().ok()) {
        identity = identity.with_subject(subject);
    }
    Ok(identity)
}

/// Handler for GET /fetch?key=...
///
/// Runs the key through the mediator: policy check, cache lookup, then
/// (possibly shared) production.
pub async fn fetch_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<KeyQuery>,
) -> Result<Json<FetchResponse>> {
    let identity = identity_from_headers(&headers)?;
    let key = query.request_key()?;

    let (value, origin) = state
        .mediator
        .request(key.clone(), &identity)
        .await
        .into_result(&key, &identity)?;

    Ok(Json(FetchResponse::new(key.as_str(), value, origin)))
}

/// Handler for DELETE /cache?key=...
///
/// Invalidation goes through the same access policy as fetching.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<KeyQuery>,
) -> Result<Json<InvalidateResponse>> {
    let identity = identity_from_headers(&headers)?;
    let key = query.request_key()?;

    if !state.mediator.authorize(&identity, &key).is_allowed() {
        return Err(ProxyError::AccessDenied {
            role: identity.role.to_string(),
            key: key.to_string(),
        });
    }

    let invalidated = state.mediator.invalidate(&key).await;
    Ok(Json(InvalidateResponse::new(key.as_str(), invalidated)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.mediator.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
