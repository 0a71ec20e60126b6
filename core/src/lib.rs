//! # User Management Core
//!
//! Core business logic and domain layer for the user management backend.
//! This crate contains domain entities, the normalized error model and its
//! translator, repository interfaces, and the account services that tie
//! authorization, persistence and result shaping together.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{AccountChanges, Actor, Claims, NewAccount, NewUser, Role, User, UserChanges, UserView};
pub use errors::{
    translate, AppError, AppResult, Context, ErrorKind, ErrorMetadata, Failure, StoreError,
    StoreErrorCode, TokenError,
};
pub use repositories::{InMemoryUserRepository, RepositoryCall, UnitOfWork, UserRepository};
pub use services::{
    authorize, check_role, register_in_transaction, Operation, PasswordHasher, TokenService,
    TokenServiceConfig, UserService, UserServiceConfig,
};
