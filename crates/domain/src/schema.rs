//! Structural validation of decoded API responses.
//!
//! Deserialization guarantees that required fields are present and enums hold
//! known values. `Schema` adds the checks serde cannot express (non-blank
//! identifiers, email format, non-negative amounts) so a response is rejected
//! as a whole before it reaches a caller.

use serde_json::Value as JsonValue;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::models::{
    AccessibilityReport, Activity, AuthVerification, DashboardMetrics, SystemMetric, SystemStatus,
    TokenQuota, TokenUsage, User, UserPage,
};

/// A decoded value that failed structural validation.
#[derive(Debug, Clone, Error)]
#[error("{location}: {errors}")]
pub struct SchemaError {
    /// Position of the offending value, `$` for the root or `$[3]` for a list item.
    pub location: String,
    pub errors: ValidationErrors,
}

/// Types whose decoded values can be checked against their schema.
pub trait Schema {
    fn check(&self) -> Result<(), SchemaError>;
}

macro_rules! impl_schema_via_validate {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Schema for $ty {
                fn check(&self) -> Result<(), SchemaError> {
                    self.validate().map_err(|errors| SchemaError {
                        location: "$".to_string(),
                        errors,
                    })
                }
            }
        )*
    };
}

impl_schema_via_validate!(
    AccessibilityReport,
    Activity,
    AuthVerification,
    DashboardMetrics,
    SystemMetric,
    SystemStatus,
    TokenQuota,
    TokenUsage,
    User,
    UserPage,
);

impl<T: Schema> Schema for Vec<T> {
    fn check(&self) -> Result<(), SchemaError> {
        for (index, item) in self.iter().enumerate() {
            item.check().map_err(|err| SchemaError {
                location: format!("$[{}]", index),
                errors: err.errors,
            })?;
        }
        Ok(())
    }
}

/// Opaque payloads are passed through unchecked.
impl Schema for JsonValue {
    fn check(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}
