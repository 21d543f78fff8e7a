//! Access Policy Module
//!
//! Decides whether a caller may request a given key. Policies are pure:
//! no I/O, no side effects, same inputs give the same decision.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProxyError;
use crate::key::RequestKey;

// == Role ==
/// Caller role used by access policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "guest" => Ok(Role::Guest),
            other => Err(ProxyError::InvalidRequest(format!("Unknown role: {}", other))),
        }
    }
}

// == Identity ==
/// Attributes of the caller issuing a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Role checked by the access policy
    pub role: Role,
    /// Optional caller name, only used for logging
    #[serde(default)]
    pub subject: Option<String>,
}

impl Identity {
    pub fn new(role: Role) -> Self {
        Self { role, subject: None }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    pub fn guest() -> Self {
        Self::new(Role::Guest)
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

// == Decision ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

// == Access Policy Trait ==
/// Gates requests by caller identity.
pub trait AccessPolicy: Send + Sync {
    fn authorize(&self, identity: &Identity, key: &RequestKey) -> Decision;
}

// == Allow All ==
/// Policy that lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn authorize(&self, _identity: &Identity, _key: &RequestKey) -> Decision {
        Decision::Allow
    }
}

// == Role Allow List ==
/// Policy that allows only the listed roles.
#[derive(Debug, Clone, Default)]
pub struct RoleAllowList {
    allowed: HashSet<Role>,
}

impl RoleAllowList {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }

    /// Allows administrators only.
    pub fn admin_only() -> Self {
        Self::new([Role::Admin])
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

impl AccessPolicy for RoleAllowList {
    fn authorize(&self, identity: &Identity, _key: &RequestKey) -> Decision {
        if self.allows(identity.role) {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}
