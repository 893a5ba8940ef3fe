//! Domain layer for the Campus Admin gateway.
//!
//! This crate contains:
//! - Data model snapshots returned by the backend API
//! - Request bodies sent to the backend API
//! - The `Schema` trait used to validate decoded responses

pub mod models;
pub mod schema;

pub use schema::{Schema, SchemaError};
