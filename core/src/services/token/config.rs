//! Configuration for the token service

use um_shared::AuthConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_ttl_seconds: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for TokenServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret().to_string(),
            access_token_ttl_seconds: config.jwt.access_token_expiry,
        }
    }
}
