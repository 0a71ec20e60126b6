//! Initial administrator account created at startup

use serde::{Deserialize, Serialize};

/// Credentials for the administrator seeded on an empty database
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SeedConfig {
    /// Read `SEED_ADMIN_NAME`, `SEED_ADMIN_EMAIL` and `SEED_ADMIN_PASSWORD`.
    ///
    /// Returns `None` unless both email and password are set.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("SEED_ADMIN_EMAIL").ok()?;
        let password = std::env::var("SEED_ADMIN_PASSWORD").ok()?;
        if email.is_empty() || password.is_empty() {
            return None;
        }

        Some(Self {
            name: std::env::var("SEED_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
            email,
            password,
        })
    }
}
