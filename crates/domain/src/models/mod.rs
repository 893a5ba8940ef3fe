//! Domain models for the Campus Admin gateway.

pub mod accessibility;
pub mod activity;
pub mod ai_usage;
pub mod auth;
pub mod dashboard;
pub mod system;
pub mod user;

pub use accessibility::{AccessibilityReport, ConformanceLevel, Impact, Violation};
pub use activity::{Activity, ActivityType, Severity};
pub use ai_usage::{QuotaUpdate, Timeframe, TokenQuota, TokenUsage};
pub use auth::AuthVerification;
pub use dashboard::DashboardMetrics;
pub use system::{OperationalState, ServiceHealth, SystemMetric, SystemStatus};
pub use user::{User, UserPage, UserRole, UserUpdate};
