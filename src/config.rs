//! Configuration Module
//!
//! Loads gateway and mediator settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::EvictionPolicy;
use crate::policy::Role;

// == Producer Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerKind {
    /// Synthetic content after a delay
    Simulated,
    /// Keys are URLs fetched over HTTP
    Http,
}

impl FromStr for ProducerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(ProducerKind::Simulated),
            "http" => Ok(ProducerKind::Http),
            other => Err(format!("unknown producer kind: {}", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// LRU bound on cached results, 0 = unbounded
    pub max_entries: usize,
    /// Lifetime of cached results in seconds, 0 = never expire
    pub entry_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background purge interval in seconds
    pub cleanup_interval: u64,
    /// Which resource producer to construct
    pub producer: ProducerKind,
    /// Simulated producer latency in milliseconds
    pub producer_delay_ms: u64,
    /// HTTP producer request timeout in seconds
    pub http_timeout: u64,
    /// Roles let through by the access policy, None = everyone
    pub allowed_roles: Option<Vec<Role>>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - LRU bound (default: 0, unbounded)
    /// - `ENTRY_TTL` - Entry lifetime in seconds (default: 0, no expiry)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Purge frequency in seconds (default: 1)
    /// - `PRODUCER` - `simulated` or `http` (default: simulated)
    /// - `PRODUCER_DELAY_MS` - Simulated latency (default: 2000)
    /// - `HTTP_TIMEOUT` - HTTP producer timeout in seconds (default: 30)
    /// - `ALLOWED_ROLES` - Comma separated roles, `*` for all (default: admin)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            entry_ttl: parse_var("ENTRY_TTL").unwrap_or(defaults.entry_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            producer: parse_var("PRODUCER").unwrap_or(defaults.producer),
            producer_delay_ms: parse_var("PRODUCER_DELAY_MS")
                .unwrap_or(defaults.producer_delay_ms),
            http_timeout: parse_var("HTTP_TIMEOUT").unwrap_or(defaults.http_timeout),
            allowed_roles: env::var("ALLOWED_ROLES")
                .ok()
                .and_then(|v| parse_roles(&v))
                .unwrap_or(defaults.allowed_roles),
        }
    }

    /// Cache bounds derived from `max_entries` and `entry_ttl`.
    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy::unbounded()
            .with_max_entries(self.max_entries)
            .with_ttl(Duration::from_secs(self.entry_ttl))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 0,
            entry_ttl: 0,
            server_port: 3000,
            cleanup_interval: 1,
            producer: ProducerKind::Simulated,
            producer_delay_ms: 2000,
            http_timeout: 30,
            allowed_roles: Some(vec![Role::Admin]),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Parses `ALLOWED_ROLES`. Returns `Some(None)` for `*`, None if invalid.
fn parse_roles(value: &str) -> Option<Option<Vec<Role>>> {
    if value.trim() == "*" {
        return Some(None);
    }

    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<Role>().ok())
        .collect::<Option<Vec<_>>>()
        .map(Some)
}
