use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use um_core::domain::entities::user::{AccountChanges, NewAccount, Role, UserView};
use um_core::errors::{AppError, ErrorMetadata};
use um_shared::Pagination;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::handlers::validation::{payload_error, INVALID_FIELD, MUST_CHOSE_OPTION};

/// Body of `POST /api/register`
///
/// Every field is optional at the serde level so that a missing field is
/// reported by the validator with its name.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    #[validate(required, length(min = 1))]
    pub password: Option<String>,

    /// "ADMIN" or "USER"
    #[validate(required, custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl RegisterRequest {
    /// Validate and convert into the core input
    pub fn into_account(self) -> Result<NewAccount, AppError> {
        self.validate().map_err(|e| payload_error(&e))?;

        Ok(NewAccount {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            role: parse_role(self.role.as_deref().unwrap_or_default())?,
        })
    }
}

/// Body of `PATCH /api/user`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,

    #[validate(length(min = 1))]
    pub email: Option<String>,

    #[validate(length(min = 1))]
    pub password: Option<String>,

    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl UpdateRequest {
    /// Validate and convert into the core partial update
    pub fn into_changes(self) -> Result<AccountChanges, AppError> {
        self.validate().map_err(|e| payload_error(&e))?;

        let role = match self.role.as_deref() {
            Some(role) => Some(parse_role(role)?),
            None => None,
        };

        Ok(AccountChanges {
            name: self.name,
            email: self.email,
            password: self.password,
            role,
        })
    }
}

/// `?id=` of the single-user routes
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct IdQuery {
    #[validate(required, length(min = 1))]
    pub id: Option<String>,
}

impl IdQuery {
    pub fn parse(&self) -> Result<Uuid, AppError> {
        self.validate().map_err(|e| payload_error(&e))?;

        let raw = self.id.as_deref().unwrap_or_default();
        Uuid::parse_str(raw).map_err(|_| {
            AppError::payload(format!("id must be a valid identifier: {}", raw)).with_metadata(
                vec![ErrorMetadata::new("id", raw).with_reason(INVALID_FIELD)],
            )
        })
    }
}

/// `?offset=&limit=` of the list route
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_optional(self.offset, self.limit)
    }
}

/// `{message, user}` envelope
#[derive(Debug, Serialize)]
pub struct UserResponse<T> {
    pub message: &'static str,
    pub user: T,
}

/// `{message, users}` envelope
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub message: &'static str,
    pub users: Vec<UserView>,
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role.parse::<Role>().is_ok() {
        return Ok(());
    }

    let mut error = ValidationError::new(MUST_CHOSE_OPTION);
    error.message = Some(Cow::from("role must be one of [ADMIN, USER]"));
    error.add_param(Cow::from("value"), &role);
    Err(error)
}

fn parse_role(role: &str) -> Result<Role, AppError> {
    role.parse::<Role>().map_err(|e| {
        AppError::payload(e.to_string()).with_metadata(vec![
            ErrorMetadata::new("role", role).with_reason(MUST_CHOSE_OPTION)
        ])
    })
}
