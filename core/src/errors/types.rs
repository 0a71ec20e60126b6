//! Normalized error taxonomy
//!
//! Every failure that leaves a use case is an [`AppError`]. Clients branch on
//! the stable [`ErrorKind`] name instead of parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fixed set of normalized error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    #[serde(rename = "NOT_FOUND_ERROR")]
    NotFoundError,
    #[serde(rename = "DB_CONSTRAINT_ERROR")]
    DbConstraintError,
    #[serde(rename = "AUTHORIZATION_ERROR")]
    AuthorizationError,
    #[serde(rename = "PAYLOAD_ERROR")]
    PayloadError,
    #[serde(rename = "SERVER_ERROR")]
    ServerError,
}

impl ErrorKind {
    /// Stable name rendered to clients
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::DatabaseError => "DATABASE_ERROR",
            ErrorKind::NotFoundError => "NOT_FOUND_ERROR",
            ErrorKind::DbConstraintError => "DB_CONSTRAINT_ERROR",
            ErrorKind::AuthorizationError => "AUTHORIZATION_ERROR",
            ErrorKind::PayloadError => "PAYLOAD_ERROR",
            ErrorKind::ServerError => "SERVER_ERROR",
        }
    }

    pub fn default_http_code(&self) -> u16 {
        match self {
            ErrorKind::DatabaseError => 400,
            ErrorKind::NotFoundError => 404,
            ErrorKind::DbConstraintError => 400,
            ErrorKind::AuthorizationError => 403,
            ErrorKind::PayloadError => 400,
            ErrorKind::ServerError => 500,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::DatabaseError => "Database Error",
            ErrorKind::NotFoundError => "Not found",
            ErrorKind::DbConstraintError => "Database Constraint",
            ErrorKind::AuthorizationError => "You do not have permission to execute this operation",
            ErrorKind::PayloadError => "Invalid Payload",
            ErrorKind::ServerError => "Server Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-level complaint attached to an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMetadata {
    /// Offending field
    pub key: String,

    /// Offending value, empty when unknown
    pub value: String,

    /// Machine-readable reason code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ErrorMetadata {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// The single failure representation crossing every use-case boundary
///
/// Built through [`AppError::new`] or one of the kind shortcuts, then
/// refined with the `with_*` builders before it is returned. Nothing mutates
/// it afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct AppError {
    kind: ErrorKind,
    http_code: u16,
    message: String,
    metadata: Vec<ErrorMetadata>,
    context: Option<String>,
}

impl AppError {
    /// Error of `kind` with its default status and message
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            http_code: kind.default_http_code(),
            message: kind.default_message().to_string(),
            metadata: Vec::new(),
            context: None,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DatabaseError).with_message(message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFoundError).with_message(message)
    }

    pub fn db_constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DbConstraintError).with_message(message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthorizationError).with_message(message)
    }

    pub fn payload(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadError).with_message(message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerError).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_http_code(mut self, http_code: u16) -> Self {
        self.http_code = http_code;
        self
    }

    pub fn with_metadata(mut self, metadata: Vec<ErrorMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn http_code(&self) -> u16 {
        self.http_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> &[ErrorMetadata] {
        &self.metadata
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),
}
