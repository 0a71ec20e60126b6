//! Startup seeding of the initial administrator account

use um_shared::SeedConfig;

use crate::domain::entities::user::{NewUser, Role, UserView};
use crate::errors::{translate, AppResult, Context, Failure, StoreError, StoreErrorCode};
use crate::repositories::UserRepository;

use super::service::UserService;

const SEED: Context = Context::new("User.seed", "User.seed() error: Could not seed the admin user.");

impl<R: UserRepository> UserService<R> {
    /// Create the configured ADMIN unless an account with its email exists
    ///
    /// Returns the created account, or `None` when it was already there.
    /// Every failure is reported as a seeding `DatabaseError`.
    pub async fn seed_admin(&self, seed: &SeedConfig) -> AppResult<Option<UserView>> {
        self.try_seed_admin(seed)
            .await
            .map_err(|f| translate(f, &SEED))
    }

    async fn try_seed_admin(&self, seed: &SeedConfig) -> Result<Option<UserView>, Failure> {
        let existing = self
            .repository()
            .find_by_email(&seed.email)
            .await
            .map_err(Failure::Seeding)?;
        if existing.is_some() {
            tracing::debug!(email = %seed.email, "Admin account already present, skipping seed");
            return Ok(None);
        }

        let password_hash = self
            .passwords()
            .hash(&seed.password)
            .await
            .map_err(|e| {
                Failure::Seeding(StoreError::new(StoreErrorCode::Seeding, e.to_string()))
            })?;
        let admin = NewUser::new(
            seed.name.clone(),
            seed.email.clone(),
            password_hash,
            Role::Admin,
        );

        let created = self
            .repository()
            .create(admin)
            .await
            .map_err(Failure::Seeding)?;
        tracing::info!(user_id = %created.id, email = %created.email, "Seeded admin account");
        Ok(Some(created))
    }
}
