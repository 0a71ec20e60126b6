//! In-memory implementation of the user repository.
//!
//! Backs the service and HTTP tests, and local runs without a database.
//! Records how often each call is made and can be told to fail a call, so
//! tests can check which repository calls a use case does and does not make.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use um_shared::Pagination;
use uuid::Uuid;

use crate::domain::entities::user::{NewUser, User, UserChanges, UserView};
use crate::errors::StoreError;

use super::trait_::{UnitOfWork, UserRepository};

/// Repository operations that can be counted or made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryCall {
    FindById,
    FindByEmail,
    List,
    Create,
    Update,
    SetAccessToken,
    Delete,
}

#[derive(Default)]
struct CallRecord {
    calls: HashMap<RepositoryCall, usize>,
    failures: HashMap<RepositoryCall, StoreError>,
}

/// User repository holding accounts in a shared vector
///
/// Clones share the same accounts. A handle returned by
/// [`UnitOfWork::begin`] works on a private snapshot that is written back on
/// commit and discarded on rollback. An open transaction holds the writer
/// lock until it is committed or rolled back, so other transactions and
/// direct writes wait for it instead of being overwritten by its commit.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
    parent: Option<Arc<RwLock<Vec<User>>>>,
    writer: Arc<Mutex<()>>,
    held: Option<Arc<OwnedMutexGuard<()>>>,
    record: Arc<RwLock<CallRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `users`
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
            ..Self::default()
        }
    }

    /// Make every later `call` fail with `error`
    pub async fn fail_on(&self, call: RepositoryCall, error: StoreError) {
        self.record.write().await.failures.insert(call, error);
    }

    /// Number of times `call` was attempted, failed attempts included
    pub async fn calls(&self, call: RepositoryCall) -> usize {
        self.record
            .read()
            .await
            .calls
            .get(&call)
            .copied()
            .unwrap_or(0)
    }

    /// Every stored account, secrets included
    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    /// Writer lock for a direct write; transaction handles already hold it
    async fn exclusive(&self) -> Option<OwnedMutexGuard<()>> {
        match self.held {
            Some(_) => None,
            None => Some(self.writer.clone().lock_owned().await),
        }
    }

    async fn enter(&self, call: RepositoryCall) -> Result<(), StoreError> {
        let mut record = self.record.write().await;
        *record.calls.entry(call).or_insert(0) += 1;
        match record.failures.get(&call) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<UserView, StoreError> {
        self.enter(RepositoryCall::FindById).await?;
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.id == id)
            .map(User::view)
            .ok_or_else(|| StoreError::not_found("user"))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.enter(RepositoryCall::FindByEmail).await?;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<UserView>, StoreError> {
        self.enter(RepositoryCall::List).await?;
        let users = self.users.read().await;
        Ok(users
            .iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .map(User::view)
            .collect())
    }

    async fn create(&self, user: NewUser) -> Result<UserView, StoreError> {
        self.enter(RepositoryCall::Create).await?;
        let _writer = self.exclusive().await;
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::unique("email", user.email));
        }

        let user = user.into_user();
        let view = user.view();
        users.push(user);
        Ok(view)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<UserView, StoreError> {
        self.enter(RepositoryCall::Update).await?;
        let _writer = self.exclusive().await;
        let mut users = self.users.write().await;

        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::unique("email", email.clone()));
            }
        }

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("user"))?;
        changes.apply_to(user);
        Ok(user.view())
    }

    async fn set_access_token(&self, id: Uuid, token: &str) -> Result<User, StoreError> {
        self.enter(RepositoryCall::SetAccessToken).await?;
        let _writer = self.exclusive().await;
        let mut users = self.users.write().await;

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("user"))?;
        user.access_token = token.to_string();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<UserView, StoreError> {
        self.enter(RepositoryCall::Delete).await?;
        let _writer = self.exclusive().await;
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("user"))?;
        Ok(users.remove(index).view())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUserRepository {
    type Transaction = InMemoryUserRepository;

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        let held = match &self.held {
            Some(guard) => guard.clone(),
            None => Arc::new(self.writer.clone().lock_owned().await),
        };
        let snapshot = self.users.read().await.clone();
        Ok(InMemoryUserRepository {
            users: Arc::new(RwLock::new(snapshot)),
            parent: Some(self.users.clone()),
            writer: self.writer.clone(),
            held: Some(held),
            record: self.record.clone(),
        })
    }

    async fn commit(&self, tx: Self::Transaction) -> Result<(), StoreError> {
        let target = tx.parent.clone().unwrap_or_else(|| self.users.clone());
        let staged = tx.users.read().await.clone();
        *target.write().await = staged;
        drop(tx);
        Ok(())
    }

    async fn rollback(&self, tx: Self::Transaction) -> Result<(), StoreError> {
        drop(tx);
        Ok(())
    }
}
