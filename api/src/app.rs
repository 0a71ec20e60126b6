//! Application factory
//!
//! Builds the Actix-web application around an [`AppState`]. The binary and
//! the integration tests share this factory, so tests exercise exactly the
//! routes, extractor configuration and middleware that run in production.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    middleware::ErrorHandlers,
    web, App, Error,
};
use tracing_actix_web::TracingLogger;
use um_core::repositories::UnitOfWork;

use crate::handlers::{json_error_handler, query_error_handler, render_unhandled};
use crate::middleware::JwtAuth;
use crate::routes::{
    health::health,
    not_found,
    register::register,
    user::{delete_user, get_user, list_users, update_user},
    AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app<S>(
    app_state: web::Data<AppState<S>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    S: UnitOfWork + 'static,
{
    let auth = JwtAuth::new(app_state.users.tokens().clone());
    let json_config = web::JsonConfig::default()
        .limit(app_state.json_limit)
        .error_handler(json_error_handler);
    let query_config = web::QueryConfig::default().error_handler(query_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .app_data(query_config)
        // Innermost first: the 500 rewrite runs before the request is logged
        .wrap(ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, render_unhandled))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health::<S>))
        .service(
            web::scope("/api")
                .route("/register", web::post().to(register::<S>))
                .service(
                    web::scope("/user")
                        .wrap(auth)
                        .route("", web::get().to(get_user::<S>))
                        .route("", web::patch().to(update_user::<S>))
                        .route("", web::delete().to(delete_user::<S>))
                        .route("/list", web::get().to(list_users::<S>)),
                ),
        )
        .default_service(web::route().to(not_found))
}
