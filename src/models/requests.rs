//! Request DTOs for the gateway API
//!
//! Defines the query parameters accepted by the gateway endpoints.

use serde::Deserialize;

use crate::error::Result;
use crate::key::RequestKey;

/// Query string for `GET /fetch` and `DELETE /cache`
///
/// # Fields
/// - `key`: The resource to fetch or invalidate (for example a URL)
#[derive(Debug, Clone, Deserialize)]
pub struct KeyQuery {
    pub key: String,
}

impl KeyQuery {
    /// Validates the key and converts it into a `RequestKey`.
    pub fn request_key(&self) -> Result<RequestKey> {
        RequestKey::parse(&self.key)
    }
}
