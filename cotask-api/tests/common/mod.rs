/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (migrations applied on connect)
/// - Test user creation with signed JWT tokens
/// - Router construction over the real application state
///
/// Tests are skipped when DATABASE_URL is not set, so the suite passes
/// on machines without PostgreSQL.

use cotask_api::app::{build_router, AppState};
use cotask_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use cotask_shared::auth::jwt::{create_token, Claims};
use cotask_shared::db::migrations::run_migrations;
use cotask_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context, or None when DATABASE_URL is not set
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return Ok(None);
        };

        let db = PgPool::connect(&url).await?;
        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-key-32-bytes!".to_string(),
            },
        };

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(Some(TestContext { db, app, config }))
    }

    /// Creates a user with a unique email and returns it with a valid token
    pub async fn create_user(&self, name: &str) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                name: name.to_string(),
                email: format!("test-{}@example.com", Uuid::new_v4()),
                // Token auth never verifies the password in these tests
                password_hash: "test_hash".to_string(),
            },
        )
        .await?;

        let claims = Claims::new(user.id, user.role);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Deletes a user; tasks and notifications cascade
    pub async fn delete_user(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
