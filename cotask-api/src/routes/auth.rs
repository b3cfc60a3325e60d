/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{self, Envelope},
};
use axum::{extract::State, http::StatusCode, Json};
use cotask_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Authentication payload returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthData {
    /// Signed JWT, valid for 7 days
    pub token: String,

    /// The authenticated user (password hash never serialized)
    pub user: User,
}

/// Register a new user
///
/// Creates a new user account and returns a token so clients can skip
/// a separate login round-trip.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "secret123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already exists
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<AuthData>>)> {
    req.validate()?;

    // Hash password
    let password_hash = password::hash_password(&req.password)?;

    // Create user; a duplicate email surfaces as 409 Conflict
    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    // Issue token
    let claims = jwt::Claims::new(user.id, user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(response::created(
        "User registered",
        AuthData { token, user },
    ))
}

/// Login endpoint
///
/// Authenticates a user and returns a JWT token.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "ada@example.com",
///   "password": "secret123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<AuthData>>)> {
    req.validate()?;

    // Same message for unknown email and wrong password
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(response::ok("Login successful", AuthData { token, user }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = RegisterRequest {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_login_request_validation() {
        let req = LoginRequest {
            email: "ada@example.com".to_string(),
            password: "anything".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = LoginRequest {
            email: "nope".to_string(),
            password: "anything".to_string(),
        };
        assert!(req.validate().is_err());
    }

    // Integration tests for register/login require a running database
}
