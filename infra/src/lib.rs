//! # Infrastructure Layer
//!
//! MySQL persistence for the user management backend. Provides the
//! connection pool and the sqlx implementation of the core
//! [`UserRepository`](um_core::repositories::UserRepository) and
//! [`UnitOfWork`](um_core::repositories::UnitOfWork) traits.

/// Database module - MySQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, MySqlUserRepository, PoolStatistics};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
