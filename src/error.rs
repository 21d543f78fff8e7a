//! Error types for the access proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Proxy Error Enum ==
/// Unified error type for the access proxy.
///
/// `Clone` so a single production failure can be handed to every caller
/// waiting on the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// The access policy rejected the request
    #[error("Access denied for role '{role}' on key: {key}")]
    AccessDenied { role: String, key: String },

    /// Lazy construction of the resource producer failed
    #[error("Producer construction failed: {0}")]
    ProducerConstructionFailed(String),

    /// The producer ran but could not satisfy the key
    #[error("Production failed for key {key}: {reason}")]
    ProductionFailed { key: String, reason: String },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Returns true when a later, independent request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProxyError::ProducerConstructionFailed(_)
                | ProxyError::ProductionFailed { .. }
                | ProxyError::Internal(_)
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            ProxyError::ProducerConstructionFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::ProductionFailed { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string(), self.is_retryable()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the access proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ProxyError::AccessDenied {
                    role: "guest".to_string(),
                    key: "k".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                ProxyError::ProducerConstructionFailed("boom".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ProxyError::ProductionFailed {
                    key: "k".to_string(),
                    reason: "404".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                ProxyError::InvalidRequest("empty key".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_retryable() {
        assert!(ProxyError::ProducerConstructionFailed("x".to_string()).is_retryable());
        assert!(!ProxyError::InvalidRequest("x".to_string()).is_retryable());
        assert!(!ProxyError::AccessDenied {
            role: "guest".to_string(),
            key: "k".to_string()
        }
        .is_retryable());
    }

    #[tokio::test]
    async fn test_error_body_reports_retryable() {
        let response = ProxyError::ProductionFailed {
            key: "k".to_string(),
            reason: "timeout".to_string(),
        }
        .into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["retryable"], true);
        assert!(json["error"].as_str().unwrap().contains("timeout"));
    }
}
