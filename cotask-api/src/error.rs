/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate HTTP status code and the uniform response envelope
/// (`{"success": false, "message": ..., "errors": [...]}`).
///
/// # Example
///
/// ```ignore
/// use cotask_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     let data = fetch_data().await?;
///     Ok(Json(data))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - e.g., unrecognized priority/status value
    BadRequest(String),

    /// Unauthorized (401) - missing/invalid/expired token, bad credentials
    Unauthorized(String),

    /// Forbidden (403) - authenticated but not permitted
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Validation failure (400) with field-level messages
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response envelope
///
/// Same shape as the success envelope, with `success: false` and an
/// optional `errors` array for field-level validation messages.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Human-readable error message
    pub message: String,

    /// Optional field-level validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Persistence-layer failures are pattern-matched centrally: unique
/// constraint violations on email become conflicts, foreign key
/// violations become bad requests, anything else is internal.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    if db_err.is_foreign_key_violation() {
                        return ApiError::BadRequest(
                            "Referenced user does not exist".to_string(),
                        );
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert request validation errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    }
}

/// Convert JWT errors to API errors
impl From<cotask_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: cotask_shared::auth::jwt::JwtError) -> Self {
        match err {
            cotask_shared::auth::jwt::JwtError::Expired => {
                ApiError::Unauthorized("Token expired".to_string())
            }
            cotask_shared::auth::jwt::JwtError::InvalidIssuer => {
                ApiError::Unauthorized("Invalid token issuer".to_string())
            }
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<cotask_shared::auth::password::PasswordError> for ApiError {
    fn from(err: cotask_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ErrorResponse {
            success: false,
            message: "Email already exists".to_string(),
            errors: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Email already exists");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
