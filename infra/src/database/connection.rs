//! Database connection pool management
//!
//! Wraps the SQLx MySQL pool with statement logging, a slow statement
//! warning and a health check used by the `/health` route.

use log::LevelFilter;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    ConnectOptions, MySqlPool, Row,
};
use std::str::FromStr;
use std::time::Duration;
use um_shared::DatabaseConfig;

use crate::InfrastructureError;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    /// SQLx MySQL connection pool
    pool: MySqlPool,
}

impl DatabasePool {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `config` - Database configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Database pool or error
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        tracing::info!(
            url = %config.redacted_url(),
            max_connections = config.max_connections,
            "Creating database connection pool"
        );

        let connect_options = Self::connect_options(&config)?;

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create database pool");
                InfrastructureError::Database(e)
            })?;

        tracing::info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Parse the URL and attach statement logging
    pub(crate) fn connect_options(
        config: &DatabaseConfig,
    ) -> Result<MySqlConnectOptions, InfrastructureError> {
        let options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

        Ok(options
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(
                LevelFilter::Warn,
                Duration::from_millis(config.slow_query_threshold),
            ))
    }

    /// Get a reference to the underlying SQLx pool
    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Check if the database connection is healthy
    ///
    /// Performs a simple query to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        tracing::debug!("Performing database health check");

        let row = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                InfrastructureError::Database(e)
            })?;

        let value: i64 = row.try_get(0)?;
        if value == 1 {
            Ok(true)
        } else {
            tracing::warn!(value, "Database health check returned unexpected value");
            Ok(false)
        }
    }

    /// Apply the bundled schema migrations
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Current connection counts, reported by `/health`
    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }
}

/// Connection pool statistics
#[derive(Debug, Clone)]
pub struct PoolStatistics {
    /// Total number of connections in the pool
    pub connections: u32,
    /// Number of idle connections
    pub idle_connections: usize,
    /// Maximum allowed connections
    pub max_connections: u32,
}
