/// Database models for CoTask
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and roles
/// - `task`: Tasks with priority/status, creator and assignee
/// - `notification`: Per-user notifications created on task assignment
///
/// # Example
///
/// ```no_run
/// use cotask_shared::models::user::{User, CreateUser};
/// use cotask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     name: "John Doe".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod notification;
pub mod task;
pub mod user;
