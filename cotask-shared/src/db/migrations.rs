/// Database migration runner
///
/// This module provides utilities for running database migrations using
/// sqlx's migration system.
///
/// # Migration Files
///
/// Migrations are stored in the `migrations/` directory at the crate root.
/// Each migration is a `{timestamp}_{name}.sql` file applied in order.
///
/// # Example
///
/// ```no_run
/// use cotask_shared::db::pool::{create_pool, DatabaseConfig};
/// use cotask_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///
///     Ok(())
/// }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending database migrations
///
/// # Safety
///
/// Migrations are run in a transaction when possible. If a migration fails,
/// it will be rolled back and an error will be returned.
///
/// # Errors
///
/// Returns an error if:
/// - A migration file is malformed
/// - A migration fails to execute
/// - Database connection is lost during migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist
///
/// This is useful for development and testing. In production, the database
/// should already exist.
///
/// # Errors
///
/// Returns an error if:
/// - Cannot connect to PostgreSQL server
/// - Don't have permission to create databases
/// - Database creation fails
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    info!("Checking if database exists");

    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
