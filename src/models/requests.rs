//! Request DTOs for the todo service API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::models::domain::{Role, TodoStatus};

/// Bounds for the list endpoint page size. Values outside the range are a
/// validation failure, never clamped.
pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;

// == Auth Requests ==

/// Request body for POST /api/v1/auth/register
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.username.trim().is_empty() {
            return Some("Username cannot be empty".to_string());
        }
        if self.password.is_empty() {
            return Some("Password cannot be empty".to_string());
        }
        if self.password != self.confirm_password {
            return Some("Passwords do not match".to_string());
        }
        None
    }
}

/// Request body for POST /api/v1/auth/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for POST /api/v1/auth/refresh
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for PATCH /api/v1/auth/users/:id/role
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Request body for PATCH /api/v1/auth/users/:id/password
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

impl UpdatePasswordRequest {
    pub fn validate(&self) -> Option<String> {
        if self.password.is_empty() {
            return Some("Password cannot be empty".to_string());
        }
        if self.password != self.confirm_password {
            return Some("Passwords do not match".to_string());
        }
        None
    }
}

// == Todo Requests ==

/// Request body for POST /api/v1/todos and POST /api/v1/todos/async.
/// The id is caller-supplied; status defaults to `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoRequest {
    pub id: i64,
    pub item: String,
    #[serde(default)]
    pub status: Option<TodoStatus>,
}

/// Request body for PUT /api/v1/todos/:id
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoRequest {
    pub item: String,
    #[serde(default)]
    pub status: Option<TodoStatus>,
}

/// Query parameters for GET /api/v1/todos
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub size: Option<i64>,
}

impl ListParams {
    /// Applies defaults (page=1, size=10) and checks bounds.
    ///
    /// Returns `(page, size)` or an error message for out-of-range values.
    pub fn validated(&self) -> std::result::Result<(i64, i64), String> {
        let page = self.page.unwrap_or(1);
        let size = self.size.unwrap_or(10);
        if page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&size) {
            return Err(format!(
                "size must be between {} and {}",
                MIN_PAGE_SIZE, MAX_PAGE_SIZE
            ));
        }
        // The store turns (page - 1) * size into an OFFSET; a page whose
        // offset cannot be represented is out of range, not a panic.
        if (page - 1).checked_mul(size).is_none() {
            return Err("page is out of range".to_string());
        }
        Ok((page, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_password_mismatch() {
        let req = RegisterRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            confirm_password: "pw2".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_register_valid() {
        let req = RegisterRequest {
            username: "alice".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        };
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_create_todo_deserialize_defaults_status() {
        let json = r#"{"id": 7, "item": "write tests"}"#;
        let req: CreateTodoRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, 7);
        assert!(req.status.is_none());
    }

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams { page: None, size: None };
        assert_eq!(params.validated().unwrap(), (1, 10));
    }

    #[test]
    fn test_list_params_bounds() {
        let cases = [(0, 10), (1, 0), (1, 101), (-3, 10), (i64::MAX, 100)];
        for (page, size) in cases {
            let params = ListParams {
                page: Some(page),
                size: Some(size),
            };
            assert!(params.validated().is_err(), "({page},{size}) should fail");
        }
        let ok = ListParams {
            page: Some(1),
            size: Some(100),
        };
        assert_eq!(ok.validated().unwrap(), (1, 100));
    }
}
