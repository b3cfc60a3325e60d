/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing
/// user accounts. Passwords are stored as Argon2id hashes, never in
/// plaintext, and the hash is excluded from serialized API responses.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'member');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(50) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
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
/// let user = User::create(&pool, CreateUser {
///     name: "John Doe".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User role for authorization decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator
    Admin,

    /// Regular member (default)
    Member,
}

impl UserRole {
    /// Gets role as string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }
}

/// User model representing a user account
///
/// The password hash is never serialized; every endpoint that returns a
/// user can serialize this struct directly.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address (stored lowercase, unique across all users)
    pub email: String,

    /// Argon2id password hash, excluded from JSON
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role (admin or member)
    pub role: UserRole,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address (stored lowercase)
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

impl User {
    /// Creates a new user in the database
    ///
    /// The email is lowercased before insertion so lookups are
    /// case-insensitive by construction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email.to_lowercase())
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates a user's display name
    ///
    /// The `updated_at` timestamp is set to the current time.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if the user doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn update_name(
        pool: &PgPool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, ordered by creation date (newest first)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
        };

        assert_eq!(create_user.email, "test@example.com");
        assert_eq!(create_user.password_hash, "hash");
    }

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Member.as_str(), "member");
    }

    #[test]
    fn test_user_serialization_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Member,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"email\":\"test@example.com\""));
        assert!(json.contains("\"role\":\"member\""));
        assert!(json.contains("createdAt"));
    }

    // Integration tests for database operations require a running database
}
