//! Access Policy
//!
//! Capability checks over the resolved caller. A required capability is a
//! point on the role ladder; a caller passes at or above that level.

use crate::error::{ApiError, Result};
use crate::models::Role;

// == Resolved Caller ==
/// The outcome of token resolution: who is calling and with what effective
/// role.
///
/// `user_id: None` means a legacy token with no bound user. Those predate user
/// accounts and are admin-equivalent by an explicit compatibility rule, so
/// they always carry `Role::Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<i64>,
    pub role: Role,
}

impl Caller {
    /// Constructs the caller for a legacy token without a bound user.
    pub fn legacy() -> Self {
        Self {
            user_id: None,
            role: Role::Admin,
        }
    }

    pub fn user(user_id: i64, role: Role) -> Self {
        Self {
            user_id: Some(user_id),
            role,
        }
    }

    // == Authorize ==
    /// Checks the role ladder against a required capability.
    ///
    /// Resolution already happened, so a failure here is 403, not 401.
    pub fn authorize(&self, required: Role) -> Result<()> {
        if self.role >= required {
            Ok(())
        } else {
            Err(ApiError::forbidden("insufficient privilege"))
        }
    }

    /// True for admins and legacy callers; both see the unfiltered todo set.
    pub fn is_admin_equivalent(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner filter for store queries: None for admin-equivalent callers
    /// (all todos), otherwise the caller's own user id.
    pub fn owner_filter(&self) -> Option<i64> {
        if self.is_admin_equivalent() {
            None
        } else {
            self.user_id
        }
    }

    /// Cache key partition for list pages: "all" or "user:{id}".
    pub fn list_scope(&self) -> String {
        match self.owner_filter() {
            None => "all".to_string(),
            Some(id) => format!("user:{id}"),
        }
    }

    /// Self-service rule: a caller may act on their own user row regardless of
    /// role.
    pub fn is_self(&self, target_user_id: i64) -> bool {
        self.user_id == Some(target_user_id)
    }
}
