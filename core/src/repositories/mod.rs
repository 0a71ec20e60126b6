pub mod user;

pub use user::{InMemoryUserRepository, RepositoryCall, UnitOfWork, UserRepository};
