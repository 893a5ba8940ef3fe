//! Backend service health models.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Health of a single backend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceHealth {
    Healthy,
    Warning,
    Error,
}

impl fmt::Display for ServiceHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceHealth::Healthy => write!(f, "healthy"),
            ServiceHealth::Warning => write!(f, "warning"),
            ServiceHealth::Error => write!(f, "error"),
        }
    }
}

/// Health snapshot of one backend service. Superseded by the next poll.
///
/// `response_time`, `uptime` and `last_checked` are display strings produced
/// by the backend (e.g. `"45ms"`, `"99.9%"`, `"2 minutes ago"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetric {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    pub status: ServiceHealth,
    pub response_time: String,
    pub uptime: String,
    pub last_checked: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Platform-wide operational state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalState {
    Operational,
    Degraded,
    Down,
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationalState::Operational => write!(f, "operational"),
            OperationalState::Degraded => write!(f, "degraded"),
            OperationalState::Down => write!(f, "down"),
        }
    }
}

/// Response of `GET /system/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SystemStatus {
    pub status: OperationalState,
    #[validate(range(min = 0.0, message = "uptime must be non-negative"))]
    pub uptime: f64,
}
