//! Activity feed models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use validator::Validate;

/// Category of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    UserLogin,
    AiQuery,
    System,
    UserRegistration,
    Migration,
    Security,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityType::UserLogin => write!(f, "user_login"),
            ActivityType::AiQuery => write!(f, "ai_query"),
            ActivityType::System => write!(f, "system"),
            ActivityType::UserRegistration => write!(f, "user_registration"),
            ActivityType::Migration => write!(f, "migration"),
            ActivityType::Security => write!(f, "security"),
        }
    }
}

/// Severity of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Success => write!(f, "success"),
        }
    }
}

/// One audit/log entry in the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Activity {
    #[validate(custom(function = "shared::validation::validate_identifier"))]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub user: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, JsonValue>>,
}

impl Activity {
    /// Entries an operator should look at.
    pub fn needs_attention(&self) -> bool {
        matches!(self.severity, Severity::Warning | Severity::Error)
            || self.kind == ActivityType::Security
    }
}
