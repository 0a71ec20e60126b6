//! Role-based authorization policy.
//!
//! Pure functions over [`Role`]; ownership rules live in the user service.

use crate::domain::entities::user::{Actor, Role};
use crate::errors::{AppError, ErrorKind};

/// Protected use cases of the account service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetOne,
    GetAll,
    Update,
    Delete,
}

impl Operation {
    /// Roles allowed to attempt the operation at all
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Operation::GetOne => &[Role::Admin, Role::User],
            Operation::GetAll => &[Role::Admin],
            Operation::Update => &[Role::Admin, Role::User],
            Operation::Delete => &[Role::Admin],
        }
    }
}

/// Fail with `AuthorizationError` unless the actor holds one of `allowed`
pub fn check_role(actor: &Actor, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        tracing::debug!(actor = %actor.id, role = %actor.role, "Role not allowed");
        Err(AppError::new(ErrorKind::AuthorizationError))
    }
}

/// Check the actor's role against the rule for `operation`
pub fn authorize(actor: &Actor, operation: Operation) -> Result<(), AppError> {
    check_role(actor, operation.allowed_roles())
}
