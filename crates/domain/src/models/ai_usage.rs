//! AI-provider token accounting models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Window for token usage queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Day => "24h",
            Timeframe::Week => "7d",
            Timeframe::Month => "30d",
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "24h" => Ok(Timeframe::Day),
            "7d" => Ok(Timeframe::Week),
            "30d" => Ok(Timeframe::Month),
            _ => Err(format!("Invalid timeframe: {} (expected 24h, 7d or 30d)", s)),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One usage-accounting record for AI-provider consumption.
///
/// Records arrive in backend order; sorting by timestamp is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub timestamp: DateTime<Utc>,
    pub tokens: u64,
    #[validate(range(min = 0.0, message = "cost must be non-negative"))]
    pub cost: f64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub provider: String,
    pub department: String,
    #[validate(custom(function = "shared::validation::validate_identifier"))]
    pub user_id: String,
}

/// Quota allocation for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuota {
    #[validate(custom(function = "shared::validation::validate_identifier"))]
    pub user_id: String,
    pub quota: u64,
    pub used: u64,
}

impl TokenQuota {
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.quota
    }
}

/// Body of `PUT /tokens/quota/{userId}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaUpdate {
    pub quota: u64,
}
