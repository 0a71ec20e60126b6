//! Pagination related types for list endpoints

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Offset/limit pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of items to skip
    #[serde(default)]
    pub offset: u32,

    /// Number of items to return
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl Pagination {
    /// Create a new pagination with custom values
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Build from optional query values, applying defaults
    ///
    /// A zero limit falls back to [`DEFAULT_LIMIT`] like a missing one.
    pub fn from_optional(offset: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            offset: offset.unwrap_or(0),
            limit: limit.filter(|&limit| limit > 0).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Calculate offset as i64 for SQL queries
    pub fn offset_i64(&self) -> i64 {
        i64::from(self.offset)
    }

    /// Calculate limit as i64 for SQL queries
    pub fn limit_i64(&self) -> i64 {
        i64::from(self.limit)
    }
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}
