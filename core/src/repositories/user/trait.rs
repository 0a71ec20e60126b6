//! User repository traits defining the persistence interface for accounts.
//!
//! Implementations live in the infrastructure crate (MySQL) and in
//! [`InMemoryUserRepository`](super::InMemoryUserRepository). Every method
//! reports backend failures as a classified [`StoreError`] so the translator
//! can normalize them without knowing which backend produced them.

use async_trait::async_trait;
use um_shared::Pagination;
use uuid::Uuid;

use crate::domain::entities::user::{NewUser, User, UserChanges, UserView};
use crate::errors::StoreError;

/// Repository trait for user account persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the public projection of one account
    ///
    /// # Returns
    /// * `Ok(UserView)` - Account found
    /// * `Err(StoreError)` with [`RecordNotFound`](crate::errors::StoreErrorCode::RecordNotFound)
    ///   when no account has this id
    async fn find_by_id(&self, id: Uuid) -> Result<UserView, StoreError>;

    /// Find the stored account registered under `email`, secrets included
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// List account projections in insertion order
    async fn list(&self, pagination: Pagination) -> Result<Vec<UserView>, StoreError>;

    /// Insert a new account
    ///
    /// Fails with a unique constraint error on `email` when the address is
    /// already taken.
    async fn create(&self, user: NewUser) -> Result<UserView, StoreError>;

    /// Apply the supplied column changes and return the refreshed projection
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<UserView, StoreError>;

    /// Store the access token issued for an account
    async fn set_access_token(&self, id: Uuid, token: &str) -> Result<User, StoreError>;

    /// Remove an account, returning the projection it had before deletion
    async fn delete(&self, id: Uuid) -> Result<UserView, StoreError>;
}

/// A repository able to group several calls into one atomic unit
///
/// `begin` hands out a transactional repository. Work done through it becomes
/// visible to other callers only once it is passed back to `commit`.
#[async_trait]
pub trait UnitOfWork: UserRepository {
    type Transaction: UserRepository + Send + 'static;

    async fn begin(&self) -> Result<Self::Transaction, StoreError>;

    async fn commit(&self, tx: Self::Transaction) -> Result<(), StoreError>;

    async fn rollback(&self, tx: Self::Transaction) -> Result<(), StoreError>;
}
