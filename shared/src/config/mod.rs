//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing and password hashing configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `seed` - Initial administrator account
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod seed;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use seed::SeedConfig;
pub use server::ServerConfig;

/// Configuration the server refuses to start with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ACCESS_TOKEN_SECRET must be set when running in {0}")]
    DefaultSecret(Environment),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Administrator seeding, disabled when absent
    #[serde(default)]
    pub seed: Option<SeedConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            seed: None,
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let auth = AuthConfig::from_env();

        if auth.jwt.is_using_default_secret() {
            if environment.is_production() {
                tracing::error!("ACCESS_TOKEN_SECRET is not set in production");
            } else {
                tracing::warn!("ACCESS_TOKEN_SECRET is not set, using the development secret");
            }
        }

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth,
            seed: SeedConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Reject settings that must not reach a production server
    ///
    /// Production refuses the built-in development JWT secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err(ConfigError::DefaultSecret(self.environment));
        }
        Ok(())
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is missing or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(environment: Environment, jwt: JwtConfig) -> AppConfig {
        AppConfig {
            environment,
            auth: AuthConfig {
                jwt,
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let config = config_for(Environment::Production, JwtConfig::default());
        assert_eq!(
            config.validate(),
            Err(ConfigError::DefaultSecret(Environment::Production))
        );
    }

    #[test]
    fn test_production_accepts_configured_secret() {
        let config = config_for(Environment::Production, JwtConfig::new("a-real-secret"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_allows_default_secret() {
        assert!(AppConfig::default().validate().is_ok());
        let staging = config_for(Environment::Staging, JwtConfig::default());
        assert!(staging.validate().is_ok());
    }
}
