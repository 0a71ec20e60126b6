//! HTTP rendering of application errors
//!
//! Every [`AppError`] leaving a handler is rendered as
//! `{name, httpCode, message, metadata}` with `httpCode` as the response
//! status. Anything else that ends up as a 500 gets the generic
//! "Unhandled Error" body instead.

use actix_web::{
    dev::ServiceResponse,
    http::StatusCode,
    middleware::ErrorHandlerResponse,
    HttpResponse, ResponseError,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use um_core::errors::{AppError, ErrorMetadata};

static ANSI_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b?\[[0-9;]*m").expect("valid color code pattern"));

static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").expect("valid newline pattern"));

/// Wire body of an error response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody<'a> {
    pub name: &'a str,
    pub http_code: u16,
    pub message: String,
    pub metadata: &'a [ErrorMetadata],
}

/// Body used when a failure never went through the translator
#[derive(Debug, Serialize)]
struct UnhandledBody {
    name: &'static str,
    message: &'static str,
}

/// An [`AppError`] on its way out of a handler
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AppError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            name: self.0.name(),
            http_code: self.status_code().as_u16(),
            message: sanitize_message(self.0.message()),
            metadata: self.0.metadata(),
        };

        if body.http_code >= 500 {
            tracing::error!(name = body.name, context = ?self.0.context(), "Request failed");
        } else {
            tracing::debug!(name = body.name, context = ?self.0.context(), "Request rejected");
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Strip terminal color codes, line breaks, `~`, `\` and `"` from a message
pub fn sanitize_message(message: &str) -> String {
    let without_colors = ANSI_COLOR.replace_all(message, "");
    let single_line = NEWLINES.replace_all(&without_colors, " ");
    single_line
        .chars()
        .filter(|c| !matches!(c, '~' | '\\' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// The generic 500 response
pub fn unhandled_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(UnhandledBody {
        name: "SERVER_ERROR",
        message: "Unhandled Error: 500",
    })
}

/// `ErrorHandlers` hook for 500 responses
///
/// Responses produced by [`ApiError`] pass through untouched; any other
/// internal error has its body replaced by [`unhandled_response`].
pub fn render_unhandled<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let translated = res
        .response()
        .error()
        .and_then(|err| err.as_error::<ApiError>())
        .is_some();

    if translated {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    tracing::error!(
        path = %res.request().path(),
        error = ?res.response().error(),
        "Unhandled error"
    );
    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, unhandled_response());
    Ok(ErrorHandlerResponse::Response(res.map_into_right_body()))
}
