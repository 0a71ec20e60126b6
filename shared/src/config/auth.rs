//! Authentication configuration: token signing and password hashing

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret key for signing access tokens (HS256)
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 86400, // 24 hours
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// bcrypt cost factor for password hashing
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    ///
    /// `ACCESS_TOKEN_SECRET` takes precedence over `JWT_SECRET`.
    pub fn from_env() -> Self {
        let secret = std::env::var("ACCESS_TOKEN_SECRET")
            .or_else(|_| std::env::var("JWT_SECRET"))
            .unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        Self {
            jwt: JwtConfig {
                secret,
                access_token_expiry: env_or("ACCESS_TOKEN_EXPIRY", 86400),
            },
            bcrypt_cost: env_or("BCRYPT_COST", default_bcrypt_cost()),
        }
    }

    /// Get JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt.secret
    }
}

fn default_bcrypt_cost() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 86400);
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret").with_access_expiry_minutes(30);

        assert_eq!(config.access_token_expiry, 1800);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_auth_config_default_cost() {
        let config = AuthConfig::default();
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.jwt_secret(), DEFAULT_SECRET);
    }
}
