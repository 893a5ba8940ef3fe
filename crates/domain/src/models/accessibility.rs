//! Accessibility compliance scan models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// WCAG conformance level a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConformanceLevel {
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

/// Impact of a violation, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

/// One failed rule on a scanned page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Violation {
    pub level: ConformanceLevel,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub rule: String,
    pub description: String,
    pub impact: Impact,
    pub elements: Vec<String>,
}

/// Result of a compliance scan for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityReport {
    pub page_url: String,
    #[validate(nested)]
    pub violations: Vec<Violation>,
    #[validate(range(min = 0.0, message = "score must be non-negative"))]
    pub score: f64,
    pub last_checked: DateTime<Utc>,
}

impl AccessibilityReport {
    /// Most severe impact among the violations, if any.
    pub fn worst_impact(&self) -> Option<Impact> {
        self.violations.iter().map(|v| v.impact).max()
    }
}
