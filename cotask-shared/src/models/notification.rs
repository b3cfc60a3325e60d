/// Notification model and database operations
///
/// Notifications are created as a side effect of task assignment and
/// updates. They are never mutated except for the `read` flag, and they
/// are the durable backstop for pushes dropped while the recipient was
/// offline: a client can always reconcile by polling its list.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     message TEXT NOT NULL,
///     read BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Notification model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Recipient user
    pub user_id: Uuid,

    /// Human-readable message text
    pub message: String,

    /// Whether the recipient has read the notification
    pub read: bool,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification for a user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The recipient does not exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        message: &str,
    ) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            RETURNING id, user_id, message, read, created_at
            "#,
        )
        .bind(user_id)
        .bind(message)
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    /// Lists a user's notifications, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, message, read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Marks a notification as read, scoped to its recipient
    ///
    /// Idempotent: marking an already-read notification succeeds.
    ///
    /// # Returns
    ///
    /// True if a notification with this id belongs to the user, false
    /// otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn mark_read(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_serializes_camel_case() {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            message: "You have been assigned a task".to_string(),
            read: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["read"], false);
    }

    // Integration tests for database operations require a running database
}
