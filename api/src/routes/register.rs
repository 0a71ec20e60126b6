use actix_web::{web, HttpResponse};
use um_core::repositories::UnitOfWork;
use um_core::services::register_in_transaction;

use crate::dto::{RegisterRequest, UserResponse};
use crate::handlers::ApiError;

use super::AppState;

/// Handler for POST /api/register
///
/// Creates the account and its first access token in one transaction.
///
/// # Request Body
///
/// ```json
/// {
///     "name": "Jon Doe",
///     "email": "jondoe@example.com",
///     "password": "secret",
///     "role": "USER"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "User registered successfully.",
///     "user": {
///         "id": "7b0c...",
///         "name": "Jon Doe",
///         "email": "jondoe@example.com",
///         "role": "USER",
///         "access_token": "eyJ...",
///         "createdAt": "2024-01-01T00:00:00Z",
///         "updatedAt": "2024-01-01T00:00:00Z"
///     }
/// }
/// ```
///
/// ## Errors
/// - 400 `PAYLOAD_ERROR` for a malformed body or an email already registered
/// - 400 `DB_CONSTRAINT_ERROR` when the store rejects the row
pub async fn register<S>(
    state: web::Data<AppState<S>>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: UnitOfWork + 'static,
{
    let account = body.into_inner().into_account()?;
    tracing::info!(email = %account.email, role = %account.role, "Processing registration");

    let user = register_in_transaction(&state.users, account).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        message: "User registered successfully.",
        user,
    }))
}
