//! MySQL implementation of the UserRepository and UnitOfWork traits.
//!
//! One type serves both the pool-backed repository and the handle returned by
//! `begin`. A transaction handle serializes its statements through a mutex
//! around the single open `sqlx::Transaction`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use um_core::domain::entities::user::{stored_now, NewUser, Role, User, UserChanges, UserView};
use um_core::errors::{StoreError, StoreErrorCode};
use um_core::repositories::{UnitOfWork, UserRepository};
use um_shared::Pagination;
use uuid::Uuid;

use super::error_mapping::map_sqlx_error;

const USER_COLUMNS: &str =
    "id, name, email, password, role, access_token, created_at, updated_at";

type SharedTransaction = Arc<Mutex<Option<Transaction<'static, MySql>>>>;

#[derive(Clone, Debug)]
enum Handle {
    Pool(MySqlPool),
    Transaction(SharedTransaction),
}

/// Run `$body` with `$exec` bound to the pool or to the open transaction
macro_rules! with_executor {
    ($handle:expr, |$exec:ident| $body:expr) => {
        match $handle {
            Handle::Pool(pool) => {
                let $exec = pool;
                $body
            }
            Handle::Transaction(cell) => {
                let mut guard = cell.lock().await;
                let tx = guard.as_mut().ok_or_else(transaction_closed)?;
                let $exec = &mut **tx;
                $body
            }
        }
    };
}

/// MySQL implementation of UserRepository
#[derive(Clone, Debug)]
pub struct MySqlUserRepository {
    handle: Handle,
}

impl MySqlUserRepository {
    /// Create a pool-backed repository
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            handle: Handle::Pool(pool),
        }
    }

    /// Whether this handle runs inside a transaction
    pub fn is_transaction(&self) -> bool {
        matches!(self.handle, Handle::Transaction(_))
    }

    /// Convert database row to User entity
    fn row_to_user(row: &MySqlRow) -> Result<User, StoreError> {
        let id: String = row.try_get("id").map_err(map_sqlx_error)?;
        let role: String = row.try_get("role").map_err(map_sqlx_error)?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| {
                StoreError::new(StoreErrorCode::Other, format!("Invalid UUID: {}", e))
            })?,
            name: row.try_get("name").map_err(map_sqlx_error)?,
            email: row.try_get("email").map_err(map_sqlx_error)?,
            password: row.try_get("password").map_err(map_sqlx_error)?,
            role: role
                .parse::<Role>()
                .map_err(|e| StoreError::new(StoreErrorCode::Other, e.to_string()))?,
            access_token: row.try_get("access_token").map_err(map_sqlx_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(map_sqlx_error)?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(map_sqlx_error)?,
        })
    }

    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let row = with_executor!(&self.handle, |exec| sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(exec)
            .await
            .map_err(map_sqlx_error)?);

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn require_user(&self, id: Uuid) -> Result<User, StoreError> {
        self.fetch_user(id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))
    }
}

fn transaction_closed() -> StoreError {
    StoreError::new(StoreErrorCode::Other, "Transaction already finished")
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<UserView, StoreError> {
        Ok(self.require_user(id).await?.view())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS);

        let row = with_executor!(&self.handle, |exec| sqlx::query(&query)
            .bind(email)
            .fetch_optional(exec)
            .await
            .map_err(map_sqlx_error)?);

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<UserView>, StoreError> {
        let query = format!(
            "SELECT {} FROM users ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
            USER_COLUMNS
        );

        let rows = with_executor!(&self.handle, |exec| sqlx::query(&query)
            .bind(pagination.limit_i64())
            .bind(pagination.offset_i64())
            .fetch_all(exec)
            .await
            .map_err(map_sqlx_error)?);

        rows.iter()
            .map(|row| Self::row_to_user(row).map(|user| user.view()))
            .collect()
    }

    async fn create(&self, user: NewUser) -> Result<UserView, StoreError> {
        let user = user.into_user();
        let query = r#"
            INSERT INTO users (
                id, name, email, password, role,
                access_token, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let _ = with_executor!(&self.handle, |exec| sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(user.role.as_str())
            .bind(&user.access_token)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(exec)
            .await
            .map_err(map_sqlx_error)?);

        tracing::debug!(user_id = %user.id, "Inserted user row");
        Ok(user.view())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<UserView, StoreError> {
        let query = r#"
            UPDATE users SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                password = COALESCE(?, password),
                role = COALESCE(?, role),
                updated_at = ?
            WHERE id = ?
        "#;

        let _ = with_executor!(&self.handle, |exec| sqlx::query(query)
            .bind(changes.name.as_deref())
            .bind(changes.email.as_deref())
            .bind(changes.password_hash.as_deref())
            .bind(changes.role.map(|r| r.as_str()))
            .bind(stored_now())
            .bind(id.to_string())
            .execute(exec)
            .await
            .map_err(map_sqlx_error)?);

        // Zero affected rows also means "nothing changed" on MySQL; the
        // re-read reports the missing row instead
        self.find_by_id(id).await
    }

    async fn set_access_token(&self, id: Uuid, token: &str) -> Result<User, StoreError> {
        let query = "UPDATE users SET access_token = ?, updated_at = ? WHERE id = ?";

        let _ = with_executor!(&self.handle, |exec| sqlx::query(query)
            .bind(token)
            .bind(stored_now())
            .bind(id.to_string())
            .execute(exec)
            .await
            .map_err(map_sqlx_error)?);

        self.require_user(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<UserView, StoreError> {
        let existing = self.require_user(id).await?;

        let result = with_executor!(&self.handle, |exec| sqlx::query(
            "DELETE FROM users WHERE id = ?"
        )
        .bind(id.to_string())
        .execute(exec)
        .await
        .map_err(map_sqlx_error)?);

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user"));
        }

        Ok(existing.view())
    }
}

#[async_trait]
impl UnitOfWork for MySqlUserRepository {
    type Transaction = MySqlUserRepository;

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        match &self.handle {
            Handle::Pool(pool) => {
                let tx = pool.begin().await.map_err(map_sqlx_error)?;
                Ok(Self {
                    handle: Handle::Transaction(Arc::new(Mutex::new(Some(tx)))),
                })
            }
            Handle::Transaction(_) => Err(StoreError::new(
                StoreErrorCode::Other,
                "Nested transactions are not supported",
            )),
        }
    }

    async fn commit(&self, tx: Self::Transaction) -> Result<(), StoreError> {
        match tx.handle {
            Handle::Transaction(cell) => {
                let tx = cell.lock().await.take().ok_or_else(transaction_closed)?;
                tx.commit().await.map_err(map_sqlx_error)
            }
            Handle::Pool(_) => Ok(()),
        }
    }

    async fn rollback(&self, tx: Self::Transaction) -> Result<(), StoreError> {
        match tx.handle {
            Handle::Transaction(cell) => {
                let tx = cell.lock().await.take().ok_or_else(transaction_closed)?;
                tx.rollback().await.map_err(map_sqlx_error)
            }
            Handle::Pool(_) => Ok(()),
        }
    }
}
