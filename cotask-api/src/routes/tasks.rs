/// Task CRUD endpoints
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create task
/// - `GET /api/tasks` - List tasks (`?status=&priority=&sortByDueDate=`)
/// - `PUT /api/tasks/:id` - Update task
/// - `DELETE /api/tasks/:id` - Delete task
///
/// # Permissions
///
/// - Listing shows tasks the user created OR is assigned to
/// - Updating requires being the creator or the assignee
/// - Deleting requires being the creator
///
/// Every successful mutation is pushed to connected clients through the
/// real-time layer, and assignment changes additionally persist a
/// notification for the assignee.

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult},
    response::{self, Envelope},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use cotask_shared::models::{
    notification::Notification,
    task::{CreateTask, DueDateSort, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask},
    user::User,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Due date
    pub due_date: DateTime<Utc>,

    /// Priority as free text (normalized case-insensitively)
    pub priority: String,

    /// Optional status as free text (defaults to "todo")
    pub status: Option<String>,

    /// Assignee user id
    pub assigned_to_id: Uuid,
}

/// Update task request
///
/// All fields optional; only supplied fields are changed.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    pub priority: Option<String>,

    pub status: Option<String>,

    pub assigned_to_id: Option<Uuid>,
}

/// Task list query parameters
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    /// Filter by status (free text, normalized)
    pub status: Option<String>,

    /// Filter by priority (free text, normalized)
    pub priority: Option<String>,

    /// "desc" for descending; anything else (or absent) is ascending
    pub sort_by_due_date: Option<String>,
}

fn parse_priority(input: &str) -> Result<TaskPriority, ApiError> {
    TaskPriority::parse(input)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid task priority: {}", input)))
}

fn parse_status(input: &str) -> Result<TaskStatus, ApiError> {
    TaskStatus::parse(input)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid task status: {}", input)))
}

/// Creates a task
///
/// The authenticated user becomes the creator. If the assignee is someone
/// else, a notification is persisted for them and pushed if they are
/// connected.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or unrecognized priority/status
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: Assignee does not exist
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Task>>)> {
    req.validate()?;

    let priority = parse_priority(&req.priority)?;
    let status = match req.status.as_deref() {
        Some(s) => parse_status(s)?,
        None => TaskStatus::Todo,
    };

    // Verify the assignee exists before inserting
    let assignee = User::find_by_id(&state.db, req.assigned_to_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assigned user not found".to_string()))?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            priority,
            status,
            creator_id: current.id,
            assigned_to_id: assignee.id,
        },
    )
    .await?;

    // Notify the assignee unless they created the task themselves
    if assignee.id != current.id {
        let message = format!("You have been assigned a new task: {}", task.title);
        Notification::create(&state.db, assignee.id, &message).await?;
        state.events.task_assigned(assignee.id, &message).await;
    }

    state.events.task_created(&task);

    tracing::info!(task_id = %task.id, creator_id = %current.id, "Task created");

    Ok(response::created("Task created", task))
}

/// Lists tasks visible to the authenticated user
///
/// Returns tasks the user created or is assigned to, optionally filtered
/// by status and priority, sorted by due date (ascending unless
/// `sortByDueDate=desc`).
///
/// # Errors
///
/// - `400 Bad Request`: Unrecognized status or priority filter
/// - `401 Unauthorized`: Missing or invalid token
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<(StatusCode, Json<Envelope<Vec<Task>>>)> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let priority = query.priority.as_deref().map(parse_priority).transpose()?;

    let sort = match query.sort_by_due_date.as_deref() {
        Some(s) if s.eq_ignore_ascii_case("desc") => DueDateSort::Desc,
        _ => DueDateSort::Asc,
    };

    let tasks = Task::list_for_user(
        &state.db,
        current.id,
        TaskFilter {
            status,
            priority,
            sort,
        },
    )
    .await?;

    Ok(response::ok("Tasks retrieved", tasks))
}

/// Updates a task
///
/// Only the creator or the current assignee may update. Reassignment
/// notifies the new assignee; any other change notifies the assignee
/// unless they made the change themselves.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or unrecognized priority/status
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: Caller is neither creator nor assignee
/// - `404 Not Found`: Task or new assignee does not exist
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Task>>)> {
    req.validate()?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.creator_id != current.id && task.assigned_to_id != current.id {
        return Err(ApiError::Forbidden(
            "Not authorized to update this task".to_string(),
        ));
    }

    let priority = req.priority.as_deref().map(parse_priority).transpose()?;
    let status = req.status.as_deref().map(parse_status).transpose()?;

    // Verify a new assignee exists before writing
    if let Some(assigned_to_id) = req.assigned_to_id {
        if assigned_to_id != task.assigned_to_id {
            User::find_by_id(&state.db, assigned_to_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Assigned user not found".to_string()))?;
        }
    }

    let updated = Task::update(
        &state.db,
        task.id,
        UpdateTask {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            priority,
            status,
            assigned_to_id: req.assigned_to_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    // Notify the assignee, skipping self-inflicted changes
    if updated.assigned_to_id != current.id {
        let message = if updated.assigned_to_id != task.assigned_to_id {
            format!("You have been assigned a new task: {}", updated.title)
        } else {
            format!("Task updated: {}", updated.title)
        };
        Notification::create(&state.db, updated.assigned_to_id, &message).await?;
        state.events.task_assigned(updated.assigned_to_id, &message).await;
    }

    state.events.task_updated(&updated);

    tracing::info!(task_id = %updated.id, user_id = %current.id, "Task updated");

    Ok(response::ok("Task updated", updated))
}

/// Deletes a task
///
/// Only the creator may delete.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: Caller is not the creator
/// - `404 Not Found`: Task does not exist
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.creator_id != current.id {
        return Err(ApiError::Forbidden(
            "Only the creator can delete a task".to_string(),
        ));
    }

    Task::delete(&state.db, task.id).await?;

    state.events.task_deleted(task.id);

    tracing::info!(task_id = %task.id, user_id = %current.id, "Task deleted");

    Ok(response::no_content())
}
