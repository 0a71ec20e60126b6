//! User account service module
//!
//! Implements the account use cases (get one, list, create, update, delete,
//! register) on top of any [`UserRepository`](crate::repositories::UserRepository),
//! plus the transactional registration wrapper and startup admin seeding.

mod config;
mod password;
mod seed;
mod service;
mod transaction;

#[cfg(test)]
mod tests;

pub use config::{UserServiceConfig, DEFAULT_PASSWORD_COST};
pub use password::PasswordHasher;
pub use service::UserService;
pub use transaction::register_in_transaction;
