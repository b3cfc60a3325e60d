/// Uniform success envelope
///
/// Every endpoint wraps its payload in `{"success": true, "message": ...,
/// "data": ...}`. Errors use the same shape with `success: false` (see
/// [`crate::error::ErrorResponse`]).

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Success response envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Always true
    pub success: bool,

    /// Human-readable message
    pub message: String,

    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 200 OK with payload
pub fn ok<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }),
    )
}

/// 201 Created with payload
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }),
    )
}

/// 204 No Content
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_shape() {
        let (status, Json(body)) = ok("Tasks retrieved", json!([1, 2, 3]));
        assert_eq!(status, StatusCode::OK);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Tasks retrieved");
        assert_eq!(value["data"], json!([1, 2, 3]));
    }

    #[test]
    fn test_created_status() {
        let (status, _) = created("Task created", json!({}));
        assert_eq!(status, StatusCode::CREATED);
    }

    #[test]
    fn test_no_content() {
        assert_eq!(no_content(), StatusCode::NO_CONTENT);
    }
}
