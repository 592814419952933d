//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// SQLite connection string for the credential/todo store
    pub database_url: String,
    /// Redis connection URL; when unset the in-process cache backend is used
    pub redis_url: Option<String>,
    /// TTL in seconds for cached payloads
    pub cache_ttl: u64,
    /// Sweep interval in seconds for the in-process cache backend
    pub cleanup_interval: u64,
    /// HMAC secret for signing access tokens
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub access_token_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_token_ttl_days: i64,
    /// Run enqueued todo-create jobs inline before responding (test mode)
    pub eager_tasks: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATABASE_URL` - SQLite connection string (default: `sqlite:todos.db?mode=rwc`)
    /// - `REDIS_URL` - Redis URL; unset selects the in-process cache backend
    /// - `CACHE_TTL` - Cached payload TTL in seconds (default: 60)
    /// - `CLEANUP_INTERVAL` - In-process cache sweep interval in seconds (default: 30)
    /// - `JWT_SECRET` - Access token signing secret
    /// - `ACCESS_TOKEN_TTL_MINUTES` - Access token lifetime (default: 30)
    /// - `REFRESH_TOKEN_TTL_DAYS` - Refresh token lifetime (default: 7)
    /// - `EAGER_TASKS` - Run enqueued jobs inline, "1"/"true" (default: false)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:todos.db?mode=rwc".to_string()),
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            cache_ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me".to_string()),
            access_token_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            refresh_token_ttl_days: env::var("REFRESH_TOKEN_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            eager_tasks: env::var("EAGER_TASKS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: "sqlite:todos.db?mode=rwc".to_string(),
            redis_url: None,
            cache_ttl: 60,
            cleanup_interval: 30,
            jwt_secret: "dev-secret-change-me".to_string(),
            access_token_ttl_minutes: 30,
            refresh_token_ttl_days: 7,
            eager_tasks: false,
        }
    }
}
