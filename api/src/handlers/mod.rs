//! Error rendering and request validation handlers

pub mod error;
pub mod validation;

pub use error::{render_unhandled, sanitize_message, unhandled_response, ApiError};
pub use validation::{json_error_handler, payload_error, query_error_handler};
