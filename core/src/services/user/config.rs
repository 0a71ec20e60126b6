//! Configuration for the user account service

use um_shared::AuthConfig;

use crate::services::token::TokenServiceConfig;

/// bcrypt cost used when nothing else is configured
pub const DEFAULT_PASSWORD_COST: u32 = 10;

/// Configuration for the user account service
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// bcrypt cost factor
    pub password_cost: u32,
    /// Signing settings for the token issued at registration
    pub token: TokenServiceConfig,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            password_cost: DEFAULT_PASSWORD_COST,
            token: TokenServiceConfig::default(),
        }
    }
}

impl UserServiceConfig {
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            password_cost: config.bcrypt_cost,
            token: TokenServiceConfig::from(config),
        }
    }
}
