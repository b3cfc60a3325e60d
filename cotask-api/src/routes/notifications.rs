/// Notification endpoints
///
/// Notifications are the durable record of assignment events; real-time
/// pushes are best-effort on top of them.
///
/// # Endpoints
///
/// - `GET /api/notifications` - List the caller's notifications
/// - `PATCH /api/notifications/:id/read` - Mark one as read

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult},
    response::{self, Envelope},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use cotask_shared::models::notification::Notification;
use uuid::Uuid;

/// Lists the authenticated user's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<(StatusCode, Json<Envelope<Vec<Notification>>>)> {
    let notifications = Notification::list_for_user(&state.db, current.id).await?;

    Ok(response::ok("Notifications retrieved", notifications))
}

/// Marks a notification as read
///
/// Scoped to the caller: a notification belonging to someone else looks
/// like it does not exist. Marking an already-read notification again is
/// a no-op success.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No such notification for this user
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let found = Notification::mark_read(&state.db, id, current.id).await?;
    if !found {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(response::no_content())
}
