//! Conversion of request validation failures into `PAYLOAD_ERROR`s
//!
//! Two sources feed this module: `validator` rule violations on the DTOs and
//! serde failures raised by the `Json`/`Query` extractors before a DTO exists.
//! Each offending field becomes one metadata entry whose `reason` is a stable
//! code clients can branch on.

use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    HttpRequest,
};
use once_cell::sync::Lazy;
use regex::Regex;
use um_core::errors::{AppError, ErrorMetadata};
use validator::{ValidationError, ValidationErrors};

use super::error::ApiError;

pub const FIELD_IS_REQUIRED: &str = "FIELD_IS_REQUIRED";
pub const VALUE_IS_REQUIRED: &str = "VALUE_IS_REQUIRED";
pub const EMPTY_FIELD: &str = "EMPTY_FIELD";
pub const MUST_BE_STRING: &str = "MUST_BE_STRING";
pub const MUST_BE_NUMBER: &str = "MUST_BE_NUMBER";
pub const MUST_BE_ARRAY: &str = "MUST_BE_ARRAY";
pub const MUST_BE_OBJECT: &str = "MUST_BE_OBJECT";
pub const MUST_CHOSE_OPTION: &str = "MUST_CHOSE_OPTION";
pub const INVALID_FIELD: &str = "INVALID_FIELD";

const KNOWN_REASONS: [&str; 9] = [
    FIELD_IS_REQUIRED,
    VALUE_IS_REQUIRED,
    EMPTY_FIELD,
    MUST_BE_STRING,
    MUST_BE_NUMBER,
    MUST_BE_ARRAY,
    MUST_BE_OBJECT,
    MUST_CHOSE_OPTION,
    INVALID_FIELD,
];

static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"field `(?P<field>\w+)`").expect("valid field name pattern"));

static FOUND_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"invalid (?:type|value): \w+ `(?P<value>[^`]*)`").expect("valid value pattern")
});

/// Build a `PAYLOAD_ERROR` from `validator` failures
///
/// Fields are reported in name order so the response is stable.
pub fn payload_error(errors: &ValidationErrors) -> AppError {
    let mut fields: Vec<(String, &Vec<ValidationError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| (field.to_string(), errors))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut messages = Vec::new();
    let mut metadata = Vec::new();

    for (field, errors) in fields {
        for error in errors {
            let reason = reason_for_code(&error.code);
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| default_message(&field, reason));

            metadata.push(
                ErrorMetadata::new(field.clone(), rejected_value(error)).with_reason(reason),
            );
            messages.push(message);
        }
    }

    AppError::payload(messages.join(". ")).with_metadata(metadata)
}

/// Build a `PAYLOAD_ERROR` from a serde message produced while reading `source`
pub fn deserialize_error(message: &str, source: &str) -> AppError {
    let key = FIELD_NAME
        .captures(message)
        .map(|caps| caps["field"].to_string())
        .unwrap_or_else(|| source.to_string());
    let value = FOUND_VALUE
        .captures(message)
        .map(|caps| caps["value"].to_string())
        .unwrap_or_default();

    AppError::payload(message)
        .with_metadata(vec![ErrorMetadata::new(key, value).with_reason(serde_reason(message))])
}

/// `JsonConfig` error handler
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected JSON body");

    let error = match &err {
        JsonPayloadError::Deserialize(inner) => deserialize_error(&inner.to_string(), "body"),
        other => AppError::payload(other.to_string()),
    };
    ApiError(error).into()
}

/// `QueryConfig` error handler
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected query string");

    let error = match &err {
        QueryPayloadError::Deserialize(inner) => deserialize_error(&inner.to_string(), "query"),
        other => AppError::payload(other.to_string()),
    };
    ApiError(error).into()
}

fn reason_for_code(code: &str) -> &'static str {
    match code {
        "required" => FIELD_IS_REQUIRED,
        "length" => EMPTY_FIELD,
        other => KNOWN_REASONS
            .iter()
            .copied()
            .find(|reason| *reason == other)
            .unwrap_or(INVALID_FIELD),
    }
}

fn serde_reason(message: &str) -> &'static str {
    if message.starts_with("missing field") {
        return FIELD_IS_REQUIRED;
    }
    if message.starts_with("unknown variant") {
        return MUST_CHOSE_OPTION;
    }
    if message.contains("invalid digit")
        || message.contains("number too large")
        || message.contains("expected u")
        || message.contains("expected i")
        || message.contains("expected a number")
    {
        return MUST_BE_NUMBER;
    }
    if message.contains("expected a string") {
        return MUST_BE_STRING;
    }
    if message.contains("expected a sequence") {
        return MUST_BE_ARRAY;
    }
    if message.contains("expected struct") || message.contains("expected a map") {
        return MUST_BE_OBJECT;
    }
    if message.starts_with("EOF while parsing") {
        return VALUE_IS_REQUIRED;
    }
    INVALID_FIELD
}

fn default_message(field: &str, reason: &str) -> String {
    match reason {
        FIELD_IS_REQUIRED => format!("{} is required", field),
        EMPTY_FIELD => format!("{} is not allowed to be empty", field),
        MUST_CHOSE_OPTION => format!("{} must be one of the allowed values", field),
        _ => format!("{} is invalid", field),
    }
}

fn rejected_value(error: &ValidationError) -> String {
    match error.params.get("value") {
        Some(serde_json::Value::String(value)) => value.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
