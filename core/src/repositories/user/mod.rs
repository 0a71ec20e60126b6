pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::{InMemoryUserRepository, RepositoryCall};
pub use r#trait::{UnitOfWork, UserRepository};

#[cfg(test)]
mod tests;
