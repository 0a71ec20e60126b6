use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;
use um_api::{create_app, AppState};
use um_core::services::{UserService, UserServiceConfig};
use um_infra::{DatabasePool, MySqlUserRepository};
use um_shared::{AppConfig, Environment, LoggingConfig};

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(logging.colored)
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(&LoggingConfig::for_environment(Environment::from_env()));

    let config = AppConfig::from_env();
    config.validate().context("refusing to start")?;
    tracing::info!(
        environment = ?config.environment,
        "Starting user management API server"
    );

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to the database")?;
    database
        .run_migrations()
        .await
        .context("failed to apply database migrations")?;

    let repository = MySqlUserRepository::new(database.get_pool().clone());
    let users = UserService::new(repository, &UserServiceConfig::from_auth_config(&config.auth));

    if let Some(seed) = &config.seed {
        match users.seed_admin(seed).await.context("failed to seed the admin user")? {
            Some(admin) => tracing::info!(user_id = %admin.id, "Seeded admin user"),
            None => tracing::info!(email = %seed.email, "Admin user already present"),
        }
    }

    let state = web::Data::new(
        AppState::new(users)
            .with_database(database.clone())
            .with_json_limit(config.server.max_payload_size),
    );

    let bind_address = config.server.bind_address();
    tracing::info!(%bind_address, "Server will bind to address");

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    database.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
