//! Typed client for the campus administration backend.
//!
//! [`Gateway`] exposes one async method per backend operation. All of them go
//! through a single request primitive that adds timeouts, retries,
//! cancellation, read coalescing, schema validation, logging and metrics.

pub mod cli;
pub mod client;
pub mod coalesce;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod query_keys;
pub mod retry;
pub mod transport;

pub use client::{Gateway, REQUEST_ID_HEADER};
pub use config::Config;
pub use error::GatewayError;
pub use retry::RetryPolicy;
pub use transport::{ApiRequest, HttpTransport, MockTransport, RawResponse, Transport};
