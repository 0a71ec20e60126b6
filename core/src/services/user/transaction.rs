//! Transactional registration

use crate::domain::entities::user::{NewAccount, User};
use crate::errors::{translate, AppResult};
use crate::repositories::UnitOfWork;

use super::service::{UserService, REGISTER};

/// Run `register` inside one storage transaction
///
/// Begins a transaction on the service's store, registers through a service
/// rebound to the transaction handle, then commits on success or rolls back
/// on failure. Nothing the registration wrote survives a failure.
pub async fn register_in_transaction<S>(
    service: &UserService<S>,
    account: NewAccount,
) -> AppResult<User>
where
    S: UnitOfWork,
{
    let store = service.repository();
    let tx = store.begin().await.map_err(|e| translate(e, &REGISTER))?;
    let scoped = service.rebind(tx);

    match scoped.register(account).await {
        Ok(user) => {
            store
                .commit(scoped.into_repository())
                .await
                .map_err(|e| translate(e, &REGISTER))?;
            Ok(user)
        }
        Err(err) => {
            if let Err(rollback_err) = store.rollback(scoped.into_repository()).await {
                tracing::warn!(error = %rollback_err, "Rollback after failed registration failed");
            }
            Err(err)
        }
    }
}

