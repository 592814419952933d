//! Signed access tokens
//!
//! Short-lived HS256 tokens carrying the caller's identity. The role claim is
//! advisory only; the resolver always re-reads the user's current role.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{Role, User};

// == Claims ==
/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    pub user_id: i64,
    pub role: Role,
    /// Expiration (Unix seconds)
    pub exp: i64,
    /// Issued at (Unix seconds)
    pub iat: i64,
}

// == Keys ==
/// Encoding/decoding keys plus the configured access token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, access_ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
        }
    }

    /// Signs a new access token for the given user.
    pub fn sign(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verifies a token and returns its claims, or None on any decode failure
    /// (bad signature, malformed, expired).
    pub fn verify(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 42,
            username: "alice".to_string(),
            password_hash: String::new(),
            role: Role::Editor,
            active: true,
        }
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let keys = JwtKeys::new("secret", 30);
        let token = keys.sign(&test_user()).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.role, Role::Editor);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_fails() {
        let keys = JwtKeys::new("secret", 30);
        let other = JwtKeys::new("different", 30);
        let token = keys.sign(&test_user()).unwrap();
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_garbage_token_fails() {
        let keys = JwtKeys::new("secret", 30);
        assert!(keys.verify("not.a.jwt").is_none());
        assert!(keys.verify("").is_none());
    }
}
