//! User management endpoints
//!
//! Admin-only listing/lookup/role updates, plus password updates which allow
//! self-service: a user may change their own password regardless of role.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::auth::hash_password;
use crate::error::{ApiError, Result};
use crate::models::{
    MessageResponse, Role, UpdatePasswordRequest, UpdateRoleRequest, User, UserSummary,
    UsersListResponse,
};

use super::state::AppState;

fn summarize(user: &User) -> UserSummary {
    UserSummary {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
    }
}

/// Handler for GET /api/v1/auth/users (admin)
pub async fn list_users_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UsersListResponse>> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    caller.authorize(Role::Admin)?;

    let users = state.users.list_active().await?;
    Ok(Json(UsersListResponse {
        users: users.iter().map(summarize).collect(),
    }))
}

/// Handler for GET /api/v1/auth/users/:id (admin)
pub async fn get_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<Json<UserSummary>> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    caller.authorize(Role::Admin)?;

    let user = state
        .users
        .find(user_id)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(summarize(&user)))
}

/// Handler for PATCH /api/v1/auth/users/:id/role (admin)
pub async fn update_role_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<UserSummary>> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    caller.authorize(Role::Admin)?;

    let user = state
        .users
        .update_role(user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(summarize(&user)))
}

/// Handler for PATCH /api/v1/auth/users/:id/password
///
/// Admin-only, except that any caller may update their own password. The
/// self check compares resolved user ids and sidesteps the role ladder.
pub async fn update_password_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    if let Some(msg) = req.validate() {
        return Err(ApiError::validation(msg));
    }
    if !caller.is_admin_equivalent() && !caller.is_self(user_id) {
        return Err(ApiError::forbidden("forbidden"));
    }

    let updated = state
        .users
        .update_password(user_id, &hash_password(&req.password))
        .await?;
    if !updated {
        return Err(ApiError::not_found("user not found"));
    }
    Ok(Json(MessageResponse::new("password updated")))
}
