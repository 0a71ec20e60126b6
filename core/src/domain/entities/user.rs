//! User account entity, its read projection and the authenticated actor.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Role granted to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access to every account
    Admin,
    /// Access limited to the caller's own account
    User,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known roles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// The authenticated caller of a use case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// A stored user account, secrets included
///
/// Serialization skips the password hash. The access token is kept since the
/// registration response hands it back to the new account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    /// bcrypt hash, never plaintext
    #[serde(skip_serializing, default)]
    pub password: String,

    pub role: Role,

    #[serde(rename = "access_token")]
    pub access_token: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Read projection without password and access token
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Projection returned by every read-facing use case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input of the create and register use cases
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Partial update requested by a caller; `None` leaves the field untouched
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl fmt::Debug for AccountChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountChanges")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

/// Row handed to the repository on creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// New account with a fresh id and an empty access token
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            access_token: String::new(),
            created_at: stored_now(),
        }
    }

    /// The stored form of this row
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password: self.password_hash,
            role: self.role,
            access_token: self.access_token,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Current time at the millisecond precision of the `users` columns
pub fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Column changes handed to the repository on update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    /// Apply the supplied fields to a stored user and bump `updated_at`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password = hash.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        user.updated_at = stored_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        NewUser::new(
            "Jon Doe".to_string(),
            "jondoe@example.com".to_string(),
            "$2b$04$hash".to_string(),
            Role::User,
        )
        .into_user()
    }

    #[test]
    fn test_role_round_trip_strings() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!("admin".parse::<Role>(), Err(ParseRoleError("admin".to_string())));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert!(serde_json::from_str::<Role>("\"GUEST\"").is_err());
    }

    #[test]
    fn test_new_user_starts_with_empty_token() {
        let user = sample_user();
        assert!(user.access_token.is_empty());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_timestamps_fit_millisecond_columns() {
        let user = sample_user();
        assert_eq!(user.created_at.timestamp_subsec_nanos() % 1_000_000, 0);

        let mut updated = user.clone();
        UserChanges::default().apply_to(&mut updated);
        assert_eq!(updated.updated_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_view_json_has_no_secrets() {
        let mut user = sample_user();
        user.access_token = "secret-token".to_string();

        let json = serde_json::to_value(user.view()).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("access_token"));
        assert_eq!(object["email"], "jondoe@example.com");
        assert!(object.contains_key("createdAt"));
    }

    #[test]
    fn test_user_json_skips_password_only() {
        let mut user = sample_user();
        user.access_token = "secret-token".to_string();

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["access_token"], "secret-token");
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let mut user = sample_user();
        let before = user.clone();

        let changes = UserChanges {
            email: Some("new@x.com".to_string()),
            ..Default::default()
        };
        changes.apply_to(&mut user);

        assert_eq!(user.email, "new@x.com");
        assert_eq!(user.name, before.name);
        assert_eq!(user.role, before.role);
        assert!(user.updated_at >= before.updated_at);
    }

    #[test]
    fn test_debug_redacts_password() {
        let account = NewAccount::new("a", "a@x.com", "hunter2", Role::User);
        assert!(!format!("{:?}", account).contains("hunter2"));

        let changes = AccountChanges {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", changes).contains("hunter2"));
    }
}
