//! Main user account service implementation

use um_shared::Pagination;
use uuid::Uuid;

use crate::domain::entities::user::{
    AccountChanges, Actor, NewAccount, NewUser, User, UserChanges, UserView,
};
use crate::errors::{translate, AppError, AppResult, Context, Failure};
use crate::repositories::UserRepository;
use crate::services::authorization::{authorize, Operation};
use crate::services::token::TokenService;

use super::config::UserServiceConfig;
use super::password::PasswordHasher;

pub(crate) const GET_ONE: Context =
    Context::new("User.getOne", "User.getOne() error: Could not fetch the user.");
pub(crate) const GET_ALL: Context =
    Context::new("User.getAll", "User.getAll() error: Could not fetch the users.");
pub(crate) const CREATE: Context =
    Context::new("User.create", "User.create() error: Could not create the user.");
pub(crate) const UPDATE: Context =
    Context::new("User.update", "User.update() error: Could not update the user.");
pub(crate) const DELETE: Context =
    Context::new("User.delete", "User.delete() error: Could not delete the user.");
pub(crate) const REGISTER: Context =
    Context::new("User.register", "User.register() error: Could not register the user.");

/// Account use cases over a repository handle
///
/// The service never opens a transaction itself. It runs against whichever
/// handle it was built with; see
/// [`register_in_transaction`](super::register_in_transaction) for the
/// transactional registration path.
pub struct UserService<R> {
    repository: R,
    passwords: PasswordHasher,
    tokens: TokenService,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, config: &UserServiceConfig) -> Self {
        Self {
            repository,
            passwords: PasswordHasher::new(config.password_cost),
            tokens: TokenService::new(config.token.clone()),
        }
    }

    /// Same configuration over another repository handle
    pub fn rebind<T: UserRepository>(&self, repository: T) -> UserService<T> {
        UserService {
            repository,
            passwords: self.passwords,
            tokens: self.tokens.clone(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub(crate) fn passwords(&self) -> &PasswordHasher {
        &self.passwords
    }

    /// Fetch one account; a USER may only fetch their own
    pub async fn get_one(&self, id: Uuid, actor: &Actor) -> AppResult<UserView> {
        self.try_get_one(id, actor)
            .await
            .map_err(|f| translate(f, &GET_ONE))
    }

    async fn try_get_one(&self, id: Uuid, actor: &Actor) -> Result<UserView, Failure> {
        authorize(actor, Operation::GetOne).map_err(|e| e.with_context(GET_ONE.label()))?;

        if !actor.is_admin() && actor.id != id {
            return Err(denied(
                &GET_ONE,
                "User.getOne() error: Only ADMIN users can see other user details",
            ));
        }

        Ok(self.repository.find_by_id(id).await?)
    }

    /// List accounts; ADMIN only
    pub async fn get_all(&self, pagination: Pagination, actor: &Actor) -> AppResult<Vec<UserView>> {
        self.try_get_all(pagination, actor)
            .await
            .map_err(|f| translate(f, &GET_ALL))
    }

    async fn try_get_all(
        &self,
        pagination: Pagination,
        actor: &Actor,
    ) -> Result<Vec<UserView>, Failure> {
        authorize(actor, Operation::GetAll).map_err(|e| e.with_context(GET_ALL.label()))?;
        Ok(self.repository.list(pagination).await?)
    }

    /// Create an account with a hashed password and an empty access token
    pub async fn create(&self, account: NewAccount) -> AppResult<UserView> {
        self.try_create(account)
            .await
            .map_err(|f| translate(f, &CREATE))
    }

    async fn try_create(&self, account: NewAccount) -> Result<UserView, Failure> {
        let password_hash = self.passwords.hash(&account.password).await?;
        let user = NewUser::new(account.name, account.email, password_hash, account.role);

        let created = self.repository.create(user).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "User created");
        Ok(created)
    }

    /// Apply a partial update
    ///
    /// A USER may only update their own record and never its role. Empty
    /// strings count as not supplied.
    pub async fn update(
        &self,
        id: Uuid,
        actor: &Actor,
        changes: AccountChanges,
    ) -> AppResult<UserView> {
        self.try_update(id, actor, changes)
            .await
            .map_err(|f| translate(f, &UPDATE))
    }

    async fn try_update(
        &self,
        id: Uuid,
        actor: &Actor,
        changes: AccountChanges,
    ) -> Result<UserView, Failure> {
        authorize(actor, Operation::Update).map_err(|e| e.with_context(UPDATE.label()))?;

        if !actor.is_admin() {
            if actor.id != id {
                return Err(denied(
                    &UPDATE,
                    "User.update() error: Only ADMIN users can update other user details",
                ));
            }
            if changes.role.is_some() {
                return Err(denied(
                    &UPDATE,
                    "User.update() error: Only ADMIN users can update roles",
                ));
            }
        }

        let password_hash = match supplied(changes.password) {
            Some(password) => Some(self.passwords.hash(&password).await?),
            None => None,
        };

        let changes = UserChanges {
            name: supplied(changes.name),
            email: supplied(changes.email),
            password_hash,
            role: changes.role,
        };

        Ok(self.repository.update(id, changes).await?)
    }

    /// Remove an account; ADMIN only and never the caller's own
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> AppResult<UserView> {
        self.try_delete(id, actor)
            .await
            .map_err(|f| translate(f, &DELETE))
    }

    async fn try_delete(&self, id: Uuid, actor: &Actor) -> Result<UserView, Failure> {
        authorize(actor, Operation::Delete).map_err(|e| e.with_context(DELETE.label()))?;

        if actor.id == id {
            return Err(denied(
                &DELETE,
                "User.delete() error: A user cannot delete itself.",
            ));
        }

        let deleted = self.repository.delete(id).await?;
        tracing::info!(user_id = %deleted.id, actor = %actor.id, "User deleted");
        Ok(deleted)
    }

    /// Public sign-up: create the account, then issue and store its token
    pub async fn register(&self, account: NewAccount) -> AppResult<User> {
        self.try_register(account)
            .await
            .map_err(|f| translate(f, &REGISTER))
    }

    async fn try_register(&self, account: NewAccount) -> Result<User, Failure> {
        if self.repository.find_by_email(&account.email).await?.is_some() {
            return Err(AppError::payload(
                "User.register() error: This email is already registered.",
            )
            .with_context(REGISTER.label())
            .into());
        }

        let created = self.try_create(account).await?;
        let token = self.tokens.issue_access_token(&created)?;
        Ok(self.repository.set_access_token(created.id, &token).await?)
    }
}

fn denied(context: &Context, message: &str) -> Failure {
    AppError::authorization(message)
        .with_context(context.label())
        .into()
}

fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
