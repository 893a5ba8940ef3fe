use std::sync::Arc;

use domain::SchemaError;
use thiserror::Error;

/// Errors surfaced by the gateway.
///
/// Cloneable so a single failed round-trip can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API Error: {status} - {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    #[error("Request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    #[error("Response failed schema validation at {0}")]
    Schema(#[source] SchemaError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// HTTP status of the response, when the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether another attempt could succeed.
    ///
    /// Connection failures, timeouts, 429 and 5xx responses are transient.
    /// Client errors and bad payloads are not.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Network(_) | GatewayError::Timeout { .. } => true,
            GatewayError::Http { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Cancelled
            | GatewayError::Decode(_)
            | GatewayError::Schema(_)
            | GatewayError::InvalidRequest(_) => false,
        }
    }

    /// Short label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Http { .. } => "http",
            GatewayError::Network(_) => "network",
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::Cancelled => "cancelled",
            GatewayError::Decode(_) => "decode",
            GatewayError::Schema(_) => "schema",
            GatewayError::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(Arc::new(err))
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(Arc::new(err))
    }
}

impl From<SchemaError> for GatewayError {
    fn from(err: SchemaError) -> Self {
        GatewayError::Schema(err)
    }
}
