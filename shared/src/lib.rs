//! Shared configuration and common types for the user management server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Pagination parameters for list endpoints

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LoggingConfig, SeedConfig,
    ServerConfig,
};
pub use types::Pagination;
