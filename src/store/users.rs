//! Credential store
//!
//! Users, legacy opaque bearer tokens and refresh tokens, backed by sqlx.

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::auth::verify_password;
use crate::error::{ApiError, Result};
use crate::models::{AuthToken, Role, User};

// == User Store ==
/// CRUD over users and issued tokens. Cheap to clone; all clones share the
/// pool.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // == Register ==
    /// Creates a user with a pre-hashed password.
    ///
    /// The first user ever registered becomes admin; everyone after is a
    /// viewer. Count and insert run in one transaction; SQLite's single
    /// writer serializes concurrent first registrations in practice,
    /// the race is documented rather than locked around.
    pub async fn register(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        let role = if existing == 0 { Role::Admin } else { Role::Viewer };

        let inserted = sqlx::query(
            "INSERT INTO users (username, password_hash, role, active) VALUES (?, ?, ?, 1)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .execute(&mut *tx)
        .await;

        let id = match inserted {
            Ok(result) => result.last_insert_rowid(),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(ApiError::conflict("Username already exists"));
            }
            Err(err) => return Err(err.into()),
        };
        tx.commit().await?;

        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            active: true,
        })
    }

    // == Authenticate ==
    /// Verifies username/password. Missing user, inactive user and a wrong
    /// password are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, active FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) if user.active && verify_password(password, &user.password_hash) => {
                Ok(user)
            }
            _ => Err(ApiError::unauthorized("Invalid username or password")),
        }
    }

    // == Lookups ==
    pub async fn find(&self, id: i64) -> std::result::Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, active FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_active(&self) -> std::result::Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, active FROM users \
             WHERE active = 1 ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    // == Mutations ==
    /// Updates a user's role. Returns the updated user, or None when the user
    /// is missing or inactive.
    pub async fn update_role(
        &self,
        id: i64,
        role: Role,
    ) -> std::result::Result<Option<User>, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ? AND active = 1")
            .bind(role)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find(id).await
    }

    /// Replaces a user's password hash. Returns false when the user is
    /// missing or inactive.
    pub async fn update_password(
        &self,
        id: i64,
        password_hash: &str,
    ) -> std::result::Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ? AND active = 1")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn deactivate(&self, id: i64) -> std::result::Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // == Legacy Tokens ==
    pub async fn find_auth_token(
        &self,
        token: &str,
    ) -> std::result::Result<Option<AuthToken>, sqlx::Error> {
        sqlx::query_as::<_, AuthToken>(
            "SELECT token, user_id, active FROM auth_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    /// Inserts an opaque bearer token, optionally bound to a user. Used for
    /// seeding and tests; new logins always get signed token pairs.
    pub async fn insert_legacy_token(
        &self,
        token: &str,
        user_id: Option<i64>,
    ) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO auth_tokens (token, user_id, active, created_at) VALUES (?, ?, 1, ?)",
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // == Refresh Tokens ==
    /// Issues and persists a new opaque refresh token.
    pub async fn issue_refresh_token(
        &self,
        user_id: i64,
        ttl_days: i64,
    ) -> std::result::Result<(String, DateTime<Utc>), sqlx::Error> {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::days(ttl_days);
        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_id, expires_at, revoked, created_at) \
             VALUES (?, ?, ?, 0, ?)",
        )
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok((token, expires_at))
    }

    // == Rotate Refresh ==
    /// One-time-use rotation: validates the presented refresh token, revokes
    /// it and inserts its replacement within a single transaction, so a
    /// concurrent replay of the old token cannot win a second rotation.
    ///
    /// The unknown/revoked/expired failures carry distinct messages; clients
    /// rely on telling a replayed token apart from an expired one.
    pub async fn rotate_refresh(
        &self,
        token: &str,
        ttl_days: i64,
    ) -> Result<(User, String, DateTime<Utc>)> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i64, DateTime<Utc>, bool)> = sqlx::query_as(
            "SELECT user_id, expires_at, revoked FROM refresh_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let (user_id, expires_at, revoked) = match row {
            Some(row) => row,
            None => return Err(ApiError::unauthorized("Invalid refresh token")),
        };
        if revoked {
            return Err(ApiError::unauthorized("Refresh token has been revoked"));
        }
        if Utc::now() > expires_at {
            return Err(ApiError::unauthorized("Refresh token has expired"));
        }

        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, active FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| ApiError::unauthorized("User not found or inactive"))?;

        sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE token = ?")
            .bind(token)
            .execute(&mut *tx)
            .await?;

        let new_token = Uuid::new_v4().to_string();
        let new_expires_at = Utc::now() + Duration::days(ttl_days);
        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_id, expires_at, revoked, created_at) \
             VALUES (?, ?, ?, 0, ?)",
        )
        .bind(&new_token)
        .bind(user_id)
        .bind(new_expires_at)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((user, new_token, new_expires_at))
    }
}
