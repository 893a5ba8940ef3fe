//! Overview dashboard aggregate.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Aggregate snapshot for the overview page, recomputed server-side per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub active_users: u64,
    pub tokens_used: u64,
    #[validate(range(min = 0.0, message = "systemUptime must be non-negative"))]
    pub system_uptime: f64,
    #[validate(range(min = 0.0, message = "courseCompletion must be non-negative"))]
    pub course_completion: f64,
    pub total_users: u64,
    pub new_registrations: u64,
    pub critical_alerts: u64,
}
