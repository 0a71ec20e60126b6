//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::Claims;
pub use user::{AccountChanges, Actor, NewAccount, NewUser, ParseRoleError, Role, User, UserChanges, UserView};
