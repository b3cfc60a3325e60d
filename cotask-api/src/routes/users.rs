/// User profile endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - List all users (for assignee pickers)
/// - `GET /api/users/me` - Current user's profile
/// - `PUT /api/users/me` - Update current user's name

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult},
    response::{self, Envelope},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use cotask_shared::models::user::User;
use serde::Deserialize;
use validator::Validate;

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,
}

/// Returns the authenticated user's profile
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: User no longer exists
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<(StatusCode, Json<Envelope<User>>)> {
    let user = User::find_by_id(&state.db, current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(response::ok("Profile retrieved", user))
}

/// Updates the authenticated user's display name
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: User no longer exists
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<User>>)> {
    req.validate()?;

    let user = User::update_name(&state.db, current.id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(response::ok("Profile updated", user))
}

/// Lists all users
///
/// Used by clients to populate assignee pickers. Password hashes are
/// never serialized.
pub async fn list_users(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<Envelope<Vec<User>>>)> {
    let users = User::list(&state.db).await?;

    Ok(response::ok("Users retrieved", users))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_validation() {
        let req = UpdateProfileRequest {
            name: "Grace Hopper".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = UpdateProfileRequest {
            name: "G".to_string(),
        };
        assert!(req.validate().is_err());
    }

    // Integration tests require a running database
}
