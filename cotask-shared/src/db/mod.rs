/// Database layer for CoTask
///
/// This module provides database connection pooling and migrations.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Database migration runner
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use cotask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
