//! Auth endpoints
//!
//! Registration, login and refresh-token rotation.

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::hash_password;
use crate::error::{ApiError, Result};
use crate::models::{
    CreatedUserResponse, LoginRequest, RefreshRequest, RegisterRequest, TokenPairResponse,
};

use super::state::AppState;

/// Handler for POST /api/v1/auth/register
///
/// The first user ever registered becomes admin; everyone after starts as a
/// viewer.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>)> {
    if let Some(msg) = req.validate() {
        return Err(ApiError::validation(msg));
    }

    let user = state
        .users
        .register(req.username.trim(), &hash_password(&req.password))
        .await?;

    tracing::info!("registered user {} with role {:?}", user.username, user.role);
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse::new(user.id, user.username, user.role)),
    ))
}

/// Handler for POST /api/v1/auth/login
///
/// Returns a signed access token plus a persisted opaque refresh token.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>> {
    let user = state.users.authenticate(&req.username, &req.password).await?;

    let access_token = state
        .jwt
        .sign(&user)
        .map_err(|err| ApiError::internal(format!("token signing failed: {err}")))?;
    let (refresh_token, _expires_at) = state
        .users
        .issue_refresh_token(user.id, state.config.refresh_token_ttl_days)
        .await?;

    Ok(Json(TokenPairResponse::new(
        access_token,
        refresh_token,
        state.access_expires_in(),
    )))
}

/// Handler for POST /api/v1/auth/refresh
///
/// One-time-use rotation: the presented refresh token is revoked and replaced
/// in the same store transaction that validates it.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>> {
    let (user, refresh_token, _expires_at) = state
        .users
        .rotate_refresh(&req.refresh_token, state.config.refresh_token_ttl_days)
        .await?;

    let access_token = state
        .jwt
        .sign(&user)
        .map_err(|err| ApiError::internal(format!("token signing failed: {err}")))?;

    Ok(Json(TokenPairResponse::new(
        access_token,
        refresh_token,
        state.access_expires_in(),
    )))
}
