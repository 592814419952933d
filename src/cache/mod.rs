//! Cache layer
//!
//! Best-effort read-through/write-invalidate caching of todo payloads. Every
//! operation swallows backend failures: a cache outage degrades reads to
//! misses and writes to no-ops, it never fails the primary request.
//!
//! # Keys
//! - single todo: `todo:{id}`
//! - list page: `todos:{scope}:{page}:{size}` where scope is `all` for
//!   admin-equivalent callers or `user:{id}` otherwise
//!
//! Writes sweep the whole list key-space of the affected scopes (prefix
//! delete), so no stale list page outlives a mutation; the TTL is only a
//! backstop for the window where a sweep itself failed.

pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub use memory::MemoryCache;
pub use redis::RedisCache;

// == Cache Trait ==
/// Best-effort cache over JSON payloads. Implementations log and swallow
/// backend errors; none of these calls can fail.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the cached payload, or None on miss, expiry or backend error.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Stores a payload with the given TTL.
    async fn set(&self, key: &str, value: &Value, ttl: Duration);

    /// Removes the given keys.
    async fn delete(&self, keys: &[String]);

    /// Removes every key starting with `prefix`.
    async fn delete_prefix(&self, prefix: &str);
}

// == Key Builders ==
/// Cache key for a single todo.
pub fn todo_key(id: i64) -> String {
    format!("todo:{id}")
}

/// Cache key for one list page within a scope.
pub fn list_key(scope: &str, page: i64, size: i64) -> String {
    format!("todos:{scope}:{page}:{size}")
}

/// Key prefix covering every cached list page of a scope.
pub fn list_prefix(scope: &str) -> String {
    format!("todos:{scope}:")
}

// == Write-Path Invalidation ==
/// Sweeps the cached list pages of every scope a mutation touches. The `all`
/// scope always changes; the owner's scope changes too when the todo belongs
/// to a user.
pub async fn invalidate_lists(cache: &dyn Cache, owner: Option<i64>) {
    cache.delete_prefix(&list_prefix("all")).await;
    if let Some(user_id) = owner {
        cache.delete_prefix(&list_prefix(&format!("user:{user_id}"))).await;
    }
}

/// Invalidation rule for create and delete: drop the per-id entry and sweep
/// the affected list scopes. Update instead refreshes the per-id entry with
/// the new snapshot and only sweeps the lists.
pub async fn invalidate_todo(cache: &dyn Cache, id: i64, owner: Option<i64>) {
    cache.delete(&[todo_key(id)]).await;
    invalidate_lists(cache, owner).await;
}
