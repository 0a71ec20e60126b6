//! Maps raw failures to normalized [`AppError`]s.
//!
//! Every use case funnels its failures through [`translate`] together with a
//! static [`Context`]. Already-normalized errors pass through untouched, so
//! translating twice is harmless.

use super::failure::{Failure, StoreError, StoreErrorCode};
use super::types::{AppError, ErrorKind, ErrorMetadata};

/// Label and client-facing message of a use case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    label: &'static str,
    message: &'static str,
}

impl Context {
    pub const fn new(label: &'static str, message: &'static str) -> Self {
        Self { label, message }
    }

    /// Operation label, e.g. `User.getOne`
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Normalize any failure raised inside the use case described by `context`
pub fn translate(failure: impl Into<Failure>, context: &Context) -> AppError {
    let failure = match failure.into() {
        Failure::Normalized(err) => return err,
        other => other,
    };

    tracing::error!(
        operation = context.label(),
        error = %failure,
        "Use case failed"
    );

    let err = match failure {
        Failure::Normalized(err) => return err,
        Failure::Seeding(_) => AppError::new(ErrorKind::DatabaseError),
        Failure::Store(store) => from_store(&store),
        Failure::Validation(metadata) => {
            AppError::new(ErrorKind::PayloadError).with_metadata(metadata)
        }
        Failure::Hashing(_) | Failure::Token(_) | Failure::Internal(_) => {
            AppError::new(ErrorKind::ServerError)
        }
    };

    err.with_message(context.message())
        .with_context(context.label())
}

fn from_store(store: &StoreError) -> AppError {
    match store.code {
        StoreErrorCode::Seeding => AppError::new(ErrorKind::DatabaseError),
        code if code.is_constraint() => {
            AppError::new(ErrorKind::DbConstraintError).with_metadata(constraint_metadata(store))
        }
        code if code.is_not_found() => AppError::new(ErrorKind::NotFoundError),
        _ => AppError::new(ErrorKind::DatabaseError),
    }
}

fn constraint_metadata(store: &StoreError) -> Vec<ErrorMetadata> {
    let value = store.value.clone().unwrap_or_default();
    store
        .fields
        .iter()
        .map(|field| ErrorMetadata::new(field.clone(), value.clone()).with_reason(store.code.as_str()))
        .collect()
}
