//! Shared utilities and common types for the Campus Admin gateway.
//!
//! This crate provides functionality used across the other crates:
//! - Page-number pagination requests
//! - Reusable field validators for `validator` derives

pub mod pagination;
pub mod validation;
