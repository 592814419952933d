//! Application state
//!
//! The explicit dependency-injection context: stores, cache and token
//! machinery are constructed once by the composition root and handed to every
//! handler through axum state. No ambient globals.

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePool;

use crate::auth::{JwtKeys, TokenResolver};
use crate::cache::Cache;
use crate::config::Config;
use crate::store::{TodoStore, UserStore};

/// Shared application state. Every field is cheap to clone or Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: UserStore,
    pub todos: TodoStore,
    pub cache: Arc<dyn Cache>,
    pub resolver: TokenResolver,
    pub jwt: JwtKeys,
}

impl AppState {
    /// Wires the stores and auth machinery around an open pool and a cache
    /// backend.
    pub fn new(config: Config, pool: SqlitePool, cache: Arc<dyn Cache>) -> Self {
        let users = UserStore::new(pool.clone());
        let todos = TodoStore::new(pool);
        let jwt = JwtKeys::new(&config.jwt_secret, config.access_token_ttl_minutes);
        let resolver = TokenResolver::new(users.clone(), jwt.clone());
        Self {
            config: Arc::new(config),
            users,
            todos,
            cache,
            resolver,
            jwt,
        }
    }

    /// TTL applied to every cached payload.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache_ttl)
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_expires_in(&self) -> i64 {
        self.config.access_token_ttl_minutes * 60
    }
}
