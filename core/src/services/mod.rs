//! Business services containing domain logic and use cases.

pub mod authorization;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use authorization::{authorize, check_role, Operation};
pub use token::{TokenService, TokenServiceConfig};
pub use user::{register_in_transaction, PasswordHasher, UserService, UserServiceConfig};
