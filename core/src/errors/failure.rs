//! Raw failures produced inside a use case before translation.

use std::fmt;
use thiserror::Error;

use super::types::{AppError, ErrorMetadata, TokenError};

/// Classification supplied by the storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// Unique index violated (duplicate email)
    UniqueConstraint,
    /// Referenced row missing or still referenced
    ForeignKeyConstraint,
    /// CHECK constraint rejected the row
    CheckConstraint,
    /// Required column left null
    NullConstraint,
    /// The targeted record does not exist
    RecordNotFound,
    /// A record required by the operation does not exist
    RelatedRecordNotFound,
    /// Failure while seeding initial data
    Seeding,
    /// Pool or connection failure
    Connection,
    /// Anything else the backend reported
    Other,
}

impl StoreErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorCode::UniqueConstraint => "UNIQUE_CONSTRAINT",
            StoreErrorCode::ForeignKeyConstraint => "FOREIGN_KEY_CONSTRAINT",
            StoreErrorCode::CheckConstraint => "CHECK_CONSTRAINT",
            StoreErrorCode::NullConstraint => "NULL_CONSTRAINT",
            StoreErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            StoreErrorCode::RelatedRecordNotFound => "RELATED_RECORD_NOT_FOUND",
            StoreErrorCode::Seeding => "SEEDING",
            StoreErrorCode::Connection => "CONNECTION",
            StoreErrorCode::Other => "OTHER",
        }
    }

    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            StoreErrorCode::UniqueConstraint
                | StoreErrorCode::ForeignKeyConstraint
                | StoreErrorCode::CheckConstraint
                | StoreErrorCode::NullConstraint
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreErrorCode::RecordNotFound | StoreErrorCode::RelatedRecordNotFound
        )
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a [`UserRepository`](crate::repositories::UserRepository)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct StoreError {
    pub code: StoreErrorCode,

    /// Backend wording, logged but never shown to clients
    pub message: String,

    /// Fields named by a constraint violation
    pub fields: Vec<String>,

    /// Offending value when the backend reports it
    pub value: Option<String>,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: Vec::new(),
            value: None,
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(StoreErrorCode::RecordNotFound, format!("No {} found", resource))
    }

    pub fn unique(field: impl Into<String>, value: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            StoreErrorCode::UniqueConstraint,
            format!("Unique constraint failed on the field: {}", field),
        )
        .with_fields(vec![field])
        .with_value(value)
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Anything a use case can fail with before translation
#[derive(Error, Debug)]
pub enum Failure {
    /// Already normalized, passed through untouched
    #[error(transparent)]
    Normalized(#[from] AppError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Storage failure while seeding initial data
    #[error("seeding failed: {0}")]
    Seeding(StoreError),

    /// Payload rejected by the validation layer
    #[error("payload validation failed")]
    Validation(Vec<ErrorMetadata>),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("internal failure: {0}")]
    Internal(String),
}

impl From<bcrypt::BcryptError> for Failure {
    fn from(err: bcrypt::BcryptError) -> Self {
        Failure::Hashing(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Failure {
    fn from(err: tokio::task::JoinError) -> Self {
        Failure::Internal(err.to_string())
    }
}
