//! Request and response payloads

pub mod user;

pub use user::{IdQuery, ListQuery, RegisterRequest, UpdateRequest, UserResponse, UsersResponse};
