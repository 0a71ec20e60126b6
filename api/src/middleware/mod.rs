//! Middleware components for the API

pub mod auth;

pub use auth::{AuthContext, JwtAuth};
