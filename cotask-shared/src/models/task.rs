/// Task model and database operations
///
/// Tasks are the core entity of CoTask: created by one user, assigned to
/// another (or the same) user, with a priority, status, and due date.
///
/// Free-text priority/status input from clients is normalized here:
/// lookup is case-insensitive against a fixed dictionary and anything
/// unrecognized is rejected.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'urgent');
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'review', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(100) NOT NULL,
///     description TEXT,
///     due_date TIMESTAMPTZ NOT NULL,
///     priority task_priority NOT NULL,
///     status task_status NOT NULL DEFAULT 'todo',
///     creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assigned_to_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use cotask_shared::models::task::{Task, CreateTask, TaskPriority, TaskStatus};
/// use cotask_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write release notes".to_string(),
///     description: None,
///     due_date: Utc::now(),
///     priority: TaskPriority::High,
///     status: TaskStatus::Todo,
///     creator_id: Uuid::new_v4(),
///     assigned_to_id: Uuid::new_v4(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Normalizes free-text input to a canonical priority
    ///
    /// Lookup is case-insensitive; unrecognized values return None.
    ///
    /// # Example
    ///
    /// ```
    /// use cotask_shared::models::task::TaskPriority;
    ///
    /// assert_eq!(TaskPriority::parse("Low"), Some(TaskPriority::Low));
    /// assert_eq!(TaskPriority::parse("URGENT"), Some(TaskPriority::Urgent));
    /// assert_eq!(TaskPriority::parse("urgent!"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            "urgent" => Some(TaskPriority::Urgent),
            _ => None,
        }
    }

    /// Gets priority as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Completed,
}

impl TaskStatus {
    /// Normalizes free-text input to a canonical status
    ///
    /// Lookup is case-insensitive; both "in progress" and "in_progress"
    /// map to [`TaskStatus::InProgress`] since clients echo back the
    /// stored value while humans type the spaced form.
    ///
    /// # Example
    ///
    /// ```
    /// use cotask_shared::models::task::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::parse("In Progress"), Some(TaskStatus::InProgress));
    /// assert_eq!(TaskStatus::parse("done"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "todo" => Some(TaskStatus::Todo),
            "in progress" | "in_progress" => Some(TaskStatus::InProgress),
            "review" => Some(TaskStatus::Review),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Gets status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Sort direction for task listing (by due date)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueDateSort {
    /// Ascending (default)
    #[default]
    Asc,

    /// Descending
    Desc,
}

/// Task model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title (1..=100 chars)
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// When the task is due
    pub due_date: DateTime<Utc>,

    /// Priority (low/medium/high/urgent)
    pub priority: TaskPriority,

    /// Workflow status (todo/in_progress/review/completed)
    pub status: TaskStatus,

    /// User who created the task
    pub creator_id: Uuid,

    /// User the task is assigned to
    pub assigned_to_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub creator_id: Uuid,
    pub assigned_to_id: Uuid,
}

/// Input for updating a task
///
/// All fields are optional; only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub assigned_to_id: Option<Uuid>,
}

/// Filter and sort options for task listing
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only tasks with this status
    pub status: Option<TaskStatus>,

    /// Only tasks with this priority
    pub priority: Option<TaskPriority>,

    /// Sort by due date (ascending by default)
    pub sort: DueDateSort,
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Creator or assignee does not exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, due_date, priority, status, creator_id, assigned_to_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, due_date, priority, status,
                      creator_id, assigned_to_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.creator_id)
        .bind(data.assigned_to_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_date, priority, status,
                   creator_id, assigned_to_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates an existing task
    ///
    /// Only non-None fields in `data` are written; `updated_at` is always
    /// set to the current time.
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A new assignee does not exist (foreign key violation)
    /// - Database connection fails
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.assigned_to_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, due_date, priority, status, \
             creator_id, assigned_to_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(assigned_to_id) = data.assigned_to_id {
            q = q.bind(assigned_to_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks visible to a user (creator OR assignee), with optional
    /// status/priority filters, sorted by due date
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, title, description, due_date, priority, status, \
             creator_id, assigned_to_id, created_at, updated_at \
             FROM tasks WHERE (creator_id = $1 OR assigned_to_id = $1)",
        );
        let mut bind_count = 1;

        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }
        if filter.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND priority = ${}", bind_count));
        }

        query.push_str(match filter.sort {
            DueDateSort::Asc => " ORDER BY due_date ASC",
            DueDateSort::Desc => " ORDER BY due_date DESC",
        });

        let mut q = sqlx::query_as::<_, Task>(&query).bind(user_id);

        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(priority) = filter.priority {
            q = q.bind(priority);
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_case_insensitive() {
        assert_eq!(TaskPriority::parse("low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::parse("Low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::parse("MEDIUM"), Some(TaskPriority::Medium));
        assert_eq!(TaskPriority::parse("hIgH"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("Urgent"), Some(TaskPriority::Urgent));
    }

    #[test]
    fn test_priority_parse_rejects_unknown() {
        assert_eq!(TaskPriority::parse("urgent!"), None);
        assert_eq!(TaskPriority::parse(""), None);
        assert_eq!(TaskPriority::parse("critical"), None);
        assert_eq!(TaskPriority::parse(" low"), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TaskStatus::parse("todo"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::parse("In Progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("Review"), Some(TaskStatus::Review));
        assert_eq!(TaskStatus::parse("COMPLETED"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::parse("done"), None);
    }

    #[test]
    fn test_enum_as_str_matches_canonical_values() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
    }

    #[test]
    fn test_due_date_sort_default_is_asc() {
        assert_eq!(DueDateSort::default(), DueDateSort::Asc);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            due_date: Utc::now(),
            priority: TaskPriority::Low,
            status: TaskStatus::InProgress,
            creator_id: Uuid::new_v4(),
            assigned_to_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("dueDate").is_some());
        assert!(json.get("assignedToId").is_some());
        assert!(json.get("creatorId").is_some());
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["priority"], "low");
    }

    #[test]
    fn test_update_task_default_is_empty() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.status.is_none());
        assert!(update.assigned_to_id.is_none());
    }

    // Integration tests for database operations require a running database
}
