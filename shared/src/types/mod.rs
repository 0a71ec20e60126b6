//! Type definitions shared by the API and core layers
//!
//! - `pagination` - Offset/limit pagination for list endpoints

pub mod pagination;

pub use pagination::Pagination;
