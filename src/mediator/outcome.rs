//! Request outcomes.

use serde::Serialize;

use crate::error::{ProxyError, Result};
use crate::key::RequestKey;
use crate::policy::Identity;

// == Origin ==
/// Where a served value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Cache hit
    Cached,
    /// This request ran the producer
    Fresh,
    /// Attached to a production another request had already started
    Joined,
}

// == Outcome ==
/// Result of `Mediator::request`. Denial is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<V> {
    Denied,
    Served { value: V, origin: Origin },
    Failed(ProxyError),
}

impl<V> Outcome<V> {
    pub fn served(value: V, origin: Origin) -> Self {
        Outcome::Served { value, origin }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Denied)
    }

    pub fn is_served(&self) -> bool {
        matches!(self, Outcome::Served { .. })
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Outcome::Served { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn origin(&self) -> Option<Origin> {
        match self {
            Outcome::Served { origin, .. } => Some(*origin),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProxyError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Converts to a `Result`, reporting denial as `ProxyError::AccessDenied`.
    pub fn into_result(self, key: &RequestKey, identity: &Identity) -> Result<(V, Origin)> {
        match self {
            Outcome::Served { value, origin } => Ok((value, origin)),
            Outcome::Denied => Err(ProxyError::AccessDenied {
                role: identity.role.to_string(),
                key: key.to_string(),
            }),
            Outcome::Failed(err) => Err(err),
        }
    }
}
