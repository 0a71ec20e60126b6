//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - The user repository, pool-backed or transaction-backed
//! - Translation of MySQL failures into classified store errors

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlUserRepository;
