//! Domain types shared between the stores, the auth layer and the API
//!
//! Roles and todo statuses are stored as lowercase TEXT in SQLite and travel
//! as the same strings in JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Role ==
/// Role ladder used for capability checks. The derived ordering gives
/// viewer < editor < admin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
}

// == Todo Status ==
/// Workflow status of a todo item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TodoStatus {
    Start,
    InProcess,
    #[default]
    Pending,
    Done,
    Cancel,
}

// == User ==
/// Persisted user account. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}

// == Todo ==
/// A todo record. The id is caller-supplied; `created_at` is server-assigned
/// and `user_id` is the owning user, None for legacy callers.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub item: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<i64>,
}

// == Legacy Bearer Token ==
/// Row of the `auth_tokens` table: opaque bearer tokens issued before signed
/// tokens existed. A row without a bound user is admin-equivalent.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthToken {
    pub token: String,
    pub user_id: Option<i64>,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ladder_ordering() {
        assert!(Role::Viewer < Role::Editor);
        assert!(Role::Editor < Role::Admin);
        assert!(Role::Admin >= Role::Viewer);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, Role::Editor);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TodoStatus::InProcess).unwrap(),
            "\"in_process\""
        );
        let status: TodoStatus = serde_json::from_str("\"cancel\"").unwrap();
        assert_eq!(status, TodoStatus::Cancel);
    }

    #[test]
    fn test_status_defaults_to_pending() {
        assert_eq!(TodoStatus::default(), TodoStatus::Pending);
    }

    #[test]
    fn test_user_hides_password_hash() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            password_hash: "sha256$aa$bb".to_string(),
            role: Role::Viewer,
            active: true,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("alice"));
    }
}
