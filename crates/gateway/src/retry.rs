//! Retry policy for transient failures.

use std::time::Duration;

use reqwest::Method;

use crate::config::{ConfigValidationError, RetryConfig};
use crate::error::GatewayError;

/// Bounded retries with exponential backoff, limited to an allowlist of
/// idempotent methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub methods: Vec<Method>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff_ms: 100,
            max_backoff_ms: 2_000,
            methods: vec![Method::GET],
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn from_config(config: &RetryConfig) -> Result<Self, ConfigValidationError> {
        let methods = config
            .retry_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_uppercase().as_bytes()).map_err(|_| {
                    ConfigValidationError::InvalidValue(format!("Invalid retry method: {}", m))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            max_retries: config.max_retries,
            base_backoff_ms: config.base_backoff_ms,
            max_backoff_ms: config.max_backoff_ms,
            methods,
        })
    }

    /// Delay before retry number `retry` (1-based): 100ms, 200ms, 400ms, ...
    /// capped at `max_backoff_ms`.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let delay = self.base_backoff_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(delay.min(self.max_backoff_ms))
    }

    /// Whether a failed attempt should be retried, given how many retries
    /// have already been made.
    pub fn should_retry(&self, method: &Method, error: &GatewayError, retries_so_far: u32) -> bool {
        retries_so_far < self.max_retries && self.methods.contains(method) && error.is_transient()
    }
}
