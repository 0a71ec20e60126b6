//! Shared fixtures for the HTTP integration tests
#![allow(dead_code)]

use actix_web::web;
use um_api::AppState;
use um_core::domain::entities::user::{NewUser, Role, User};
use um_core::repositories::InMemoryUserRepository;
use um_core::services::{TokenService, TokenServiceConfig, UserService, UserServiceConfig};

pub const SECRET: &str = "test-secret";

pub fn test_config() -> UserServiceConfig {
    UserServiceConfig {
        password_cost: 4,
        token: TokenServiceConfig {
            jwt_secret: SECRET.to_string(),
            access_token_ttl_seconds: 3600,
        },
    }
}

/// Stored account with a placeholder hash
pub fn stored_user(name: &str, email: &str, role: Role) -> User {
    NewUser::new(
        name.to_string(),
        email.to_string(),
        "$2b$04$placeholderplaceholderplaceholderplaceholde".to_string(),
        role,
    )
    .into_user()
}

/// App state over an in-memory store holding an ADMIN and a USER
pub struct Harness {
    pub state: web::Data<AppState<InMemoryUserRepository>>,
    pub repo: InMemoryUserRepository,
    pub tokens: TokenService,
    pub admin: User,
    pub user: User,
}

impl Harness {
    pub fn new() -> Self {
        let admin = stored_user("The Boss", "theboss@example.com", Role::Admin);
        let user = stored_user("Jon Doe", "jondoe@example.com", Role::User);
        let repo = InMemoryUserRepository::with_users(vec![admin.clone(), user.clone()]);

        let config = test_config();
        let tokens = TokenService::new(config.token.clone());
        let state = web::Data::new(AppState::new(UserService::new(repo.clone(), &config)));

        Self {
            state,
            repo,
            tokens,
            admin,
            user,
        }
    }

    pub fn token_for(&self, user: &User) -> String {
        self.tokens.issue_access_token(&user.view()).unwrap()
    }

    pub fn admin_auth(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token_for(&self.admin)))
    }

    pub fn user_auth(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token_for(&self.user)))
    }

    pub async fn stored(&self, email: &str) -> Option<User> {
        self.repo
            .snapshot()
            .await
            .into_iter()
            .find(|u| u.email == email)
    }
}
