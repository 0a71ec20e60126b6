//! HTTP layer of the user management backend
//!
//! Exposed as a library so integration tests can build the same app the
//! binary serves.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::create_app;
pub use routes::AppState;
