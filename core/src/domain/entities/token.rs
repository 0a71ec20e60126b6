//! Access token claims embedding the account's public fields.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{Actor, Role, UserView};
use crate::errors::TokenError;

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Account id
    pub id: String,

    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates claims for an access token issued to `user`
    pub fn for_user(user: &UserView, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(ttl_seconds);

        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        }
    }

    /// Account id as a UUID
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.id).map_err(|_| TokenError::InvalidClaims)
    }

    /// The caller these claims authenticate
    pub fn actor(&self) -> Result<Actor, TokenError> {
        Ok(Actor::new(self.user_id()?, self.role))
    }
}
