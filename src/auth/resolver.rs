//! Token Resolver
//!
//! Turns a bearer credential into a [`Caller`], failing closed on anything it
//! cannot positively verify. Signed access tokens are tried first (no table
//! scan for the common case), then the legacy opaque-token table.

use axum::http::{header, HeaderMap};

use crate::auth::jwt::JwtKeys;
use crate::auth::policy::Caller;
use crate::error::{ApiError, Result};
use crate::store::UserStore;

// == Bearer Extraction ==
/// Extracts the token from an Authorization header value.
///
/// Accepts both `Bearer <token>` and a raw token without the scheme; the raw
/// form is kept for compatibility with older clients.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            Some(token.to_string())
        }
        _ => Some(raw.to_string()),
    }
}

// == Token Resolver ==
/// Resolves bearer tokens against the credential store.
#[derive(Clone)]
pub struct TokenResolver {
    users: UserStore,
    jwt: JwtKeys,
}

impl TokenResolver {
    pub fn new(users: UserStore, jwt: JwtKeys) -> Self {
        Self { users, jwt }
    }

    /// Resolves the Authorization header of a request.
    pub async fn resolve_bearer(&self, headers: &HeaderMap) -> Result<Caller> {
        let token = extract_bearer(headers)
            .ok_or_else(|| ApiError::unauthorized("Missing authorization token"))?;
        self.resolve(&token).await
    }

    /// Resolves a bare token string.
    ///
    /// 1. A verifiable signed token identifies a user; the user must still
    ///    exist and be active, and the effective role is the user's current
    ///    one, not the claim's.
    /// 2. Otherwise the token is looked up in the legacy opaque-token table.
    ///    A row without a bound user is admin-equivalent (compatibility
    ///    rule); a bound row takes the user's role.
    pub async fn resolve(&self, token: &str) -> Result<Caller> {
        if let Some(claims) = self.jwt.verify(token) {
            let user = self
                .users
                .find(claims.user_id)
                .await?
                .filter(|u| u.active)
                .ok_or_else(|| ApiError::unauthorized("User not found or inactive"))?;
            return Ok(Caller::user(user.id, user.role));
        }

        match self.users.find_auth_token(token).await? {
            Some(row) if row.active => match row.user_id {
                None => Ok(Caller::legacy()),
                Some(user_id) => {
                    let user = self
                        .users
                        .find(user_id)
                        .await?
                        .filter(|u| u.active)
                        .ok_or_else(|| ApiError::unauthorized("User not found or inactive"))?;
                    Ok(Caller::user(user.id, user.role))
                }
            },
            _ => Err(ApiError::unauthorized("Invalid or inactive token")),
        }
    }
}
