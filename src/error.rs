//! Error types for the todo service
//!
//! Provides unified error handling using thiserror. Every variant maps to an
//! HTTP status code and a JSON `{"error": ...}` body.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == API Error Enum ==
/// Unified error type for the todo service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing/invalid/expired/revoked token or bad credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Valid token but insufficient role
    #[error("{0}")]
    Forbidden(String),

    /// Operation target absent
    #[error("{0}")]
    NotFound(String),

    /// Duplicate id or username
    #[error("{0}")]
    Conflict(String),

    /// Malformed pagination or body
    #[error("{0}")]
    Validation(String),

    /// Store failure escaping the best-effort boundary
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Anything else that should surface as a 500
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::Database(err) => {
                tracing::error!("database error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, hidden_detail(&err.to_string()))
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, hidden_detail(msg))
            }
        };

        let body = Json(json!({
            "error": message
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Backend error detail is only exposed in debug builds; production clients
/// get a generic message while the real cause goes to the logs.
fn hidden_detail(detail: &str) -> String {
    if cfg!(debug_assertions) {
        detail.to_string()
    } else {
        "internal server error".to_string()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the todo service.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (ApiError::forbidden("x"), StatusCode::FORBIDDEN),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND),
            (ApiError::conflict("x"), StatusCode::CONFLICT),
            (ApiError::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_unauthorized_carries_www_authenticate() {
        let response = ApiError::unauthorized("missing token").into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_forbidden_has_no_www_authenticate() {
        let response = ApiError::forbidden("nope").into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
