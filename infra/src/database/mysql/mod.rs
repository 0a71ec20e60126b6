//! MySQL repository implementations

mod error_mapping;
mod user_repository_impl;

pub use error_mapping::map_sqlx_error;
pub use user_repository_impl::MySqlUserRepository;
