//! Route handlers
//!
//! - `register` - Public sign-up
//! - `user` - Account reads and writes behind the JWT middleware
//! - `health` - Liveness and database reachability

pub mod health;
pub mod register;
pub mod user;

use actix_web::HttpResponse;
use actix_web::ResponseError;
use um_core::errors::AppError;
use um_core::services::UserService;
use um_infra::DatabasePool;
use um_shared::ServerConfig;

use crate::handlers::ApiError;

/// Application state shared by every handler
pub struct AppState<S> {
    /// Account use cases over the pool-level store
    pub users: UserService<S>,
    /// Pool probed by `/health`, absent when running without a database
    pub database: Option<DatabasePool>,
    /// Maximum accepted JSON body in bytes
    pub json_limit: usize,
}

impl<S> AppState<S> {
    pub fn new(users: UserService<S>) -> Self {
        Self {
            users,
            database: None,
            json_limit: ServerConfig::default().max_payload_size,
        }
    }

    pub fn with_database(mut self, database: DatabasePool) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_json_limit(mut self, limit: usize) -> Self {
        self.json_limit = limit;
        self
    }
}

/// Default service for unknown routes
pub async fn not_found() -> HttpResponse {
    ApiError(AppError::not_found("Route not found")).error_response()
}
