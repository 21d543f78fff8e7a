//! Access Proxy - A mediated resource access layer
//!
//! Stands in front of an expensive, asynchronous resource producer: checks
//! an access policy, serves cached results, deduplicates concurrent
//! productions of the same key and constructs the producer only when first
//! needed.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod key;
pub mod mediator;
pub mod models;
pub mod policy;
pub mod producer;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{ProxyError, Result};
pub use key::RequestKey;
pub use mediator::{Mediator, MediatorConfig, Origin, Outcome};
pub use policy::{AccessPolicy, Decision, Identity, Role};
pub use tasks::spawn_cleanup_task;
