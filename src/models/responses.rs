//! Response DTOs for the todo service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::models::domain::{Role, Todo};

// == Auth Responses ==

/// Response body for a successful registration (POST /auth/register)
#[derive(Debug, Clone, Serialize)]
pub struct CreatedUserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub message: String,
}

impl CreatedUserResponse {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            message: "user created".to_string(),
        }
    }
}

/// Access/refresh token pair returned by login and refresh.
/// `expires_in` is the access token lifetime in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenPairResponse {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// A single user as returned by the admin user endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// Response body for GET /auth/users
#[derive(Debug, Clone, Serialize)]
pub struct UsersListResponse {
    pub users: Vec<UserSummary>,
}

// == Todo Responses ==

/// Pagination metadata for the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub pages: i64,
}

impl Pagination {
    /// Builds metadata with `pages = ceil(total / size)`.
    pub fn new(total: i64, page: i64, size: i64) -> Self {
        let pages = if size > 0 { (total + size - 1) / size } else { 0 };
        Self { total, page, size, pages }
    }
}

/// Response body for GET /todos — one cached page of todos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedTodos {
    pub todos: Vec<Todo>,
    pub pagination: Pagination,
}

/// Response body wrapping a single todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// Generic message payload. "Not found" on todo lookups is a normal message
/// outcome, not an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// == Health Response ==

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_ceiling() {
        let p = Pagination::new(25, 1, 10);
        assert_eq!(p.pages, 3);
        let exact = Pagination::new(30, 1, 10);
        assert_eq!(exact.pages, 3);
        let empty = Pagination::new(0, 1, 10);
        assert_eq!(empty.pages, 0);
    }

    #[test]
    fn test_token_pair_serialize() {
        let resp = TokenPairResponse::new("acc".to_string(), "ref".to_string(), 1800);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"token_type\":\"bearer\""));
        assert!(json.contains("1800"));
    }

    #[test]
    fn test_message_response_serialize() {
        let resp = MessageResponse::new("todo created");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("todo created"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
