//! Account routes under `/api/user`
//!
//! Every handler runs behind [`JwtAuth`](crate::middleware::JwtAuth) and
//! passes the caller's [`AuthContext`] to the use case as its actor.

use actix_web::{web, HttpResponse};
use um_core::repositories::UnitOfWork;

use crate::dto::{IdQuery, ListQuery, UpdateRequest, UserResponse, UsersResponse};
use crate::handlers::ApiError;
use crate::middleware::AuthContext;

use super::AppState;

/// GET /api/user?id=
pub async fn get_user<S>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, ApiError>
where
    S: UnitOfWork + 'static,
{
    let id = query.parse()?;
    let user = state.users.get_one(id, &auth.actor()).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        message: "User fetched successfully.",
        user,
    }))
}

/// GET /api/user/list?offset=&limit=
///
/// Offset defaults to 0 and limit to 10.
pub async fn list_users<S>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError>
where
    S: UnitOfWork + 'static,
{
    let users = state
        .users
        .get_all(query.pagination(), &auth.actor())
        .await?;

    Ok(HttpResponse::Ok().json(UsersResponse {
        message: "Users fetched successfully.",
        users,
    }))
}

/// PATCH /api/user?id=
///
/// Only the fields present in the body change.
pub async fn update_user<S>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    query: web::Query<IdQuery>,
    body: web::Json<UpdateRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: UnitOfWork + 'static,
{
    let id = query.parse()?;
    let changes = body.into_inner().into_changes()?;
    let user = state.users.update(id, &auth.actor(), changes).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        message: "User updated successfully.",
        user,
    }))
}

/// DELETE /api/user?id=
pub async fn delete_user<S>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, ApiError>
where
    S: UnitOfWork + 'static,
{
    let id = query.parse()?;
    let user = state.users.delete(id, &auth.actor()).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        message: "User deleted successfully.",
        user,
    }))
}
