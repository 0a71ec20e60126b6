//! Error model shared by every use case.

mod failure;
mod translator;
mod types;

pub use failure::{Failure, StoreError, StoreErrorCode};
pub use translator::{translate, Context};
pub use types::{AppError, AppResult, ErrorKind, ErrorMetadata, TokenError};

#[cfg(test)]
mod tests;
