//! Page-number pagination utilities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page requested when the caller does not specify one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size requested when the caller does not specify one.
pub const DEFAULT_LIMIT: u32 = 50;

/// Largest page size callers are expected to ask for.
pub const MAX_LIMIT: u32 = 500;

/// Error type for pagination input checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    #[error("Page numbers start at 1")]
    ZeroPage,
    #[error("Limit must be at least 1")]
    ZeroLimit,
    #[error("Limit {requested} exceeds the maximum of {max}")]
    LimitTooLarge { requested: u32, max: u32 },
}

/// A page-number/limit pair.
///
/// The values are carried verbatim: constructing a `PageRequest` never clamps.
/// Callers that take input from users can opt into [`PageRequest::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Checks that the page is 1-based and the limit is within `1..=MAX_LIMIT`.
    pub fn validate(&self) -> Result<(), PageRequestError> {
        if self.page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if self.limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if self.limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge {
                requested: self.limit,
                max: MAX_LIMIT,
            });
        }
        Ok(())
    }

    /// Query-string pairs in wire order (`page` first, then `limit`).
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}
