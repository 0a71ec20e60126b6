//! Token service module for JWT management
//!
//! Issues the HS256 access token handed out at registration and verifies
//! bearer tokens presented to protected routes.

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::TokenService;
