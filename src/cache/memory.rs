//! In-process cache backend
//!
//! TTL-bounded map used when no Redis URL is configured and in tests. Expired
//! entries are dropped on read; a background sweeper (see `tasks`) reclaims
//! the rest periodically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::Cache;

// == Entry ==
#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Instant,
}

impl Entry {
    fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

// == Memory Cache ==
/// Thread-safe in-process cache. Cheap to clone; clones share the map.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all expired entries. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    /// Current number of live entries (expired ones included until swept).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        // Write lock so an expired entry can be dropped on the spot
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry::new(value.clone(), ttl));
    }

    async fn delete(&self, keys: &[String]) {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
    }

    async fn delete_prefix(&self, prefix: &str) {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| !key.starts_with(prefix));
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set("k", &json!({"v": 1}), Duration::from_secs(60)).await;

        assert_eq!(cache.get("k").await.unwrap()["v"], 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = MemoryCache::new();
        assert!(cache.get("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new();
        cache.set("k", &json!(1), Duration::from_millis(10)).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.get("k").await.is_none());
        // The expired entry was dropped by the read
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("a", &json!(1), ttl).await;
        cache.set("b", &json!(2), ttl).await;

        cache.delete(&["a".to_string(), "missing".to_string()]).await;
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("todos:all:1:10", &json!(1), ttl).await;
        cache.set("todos:all:2:10", &json!(2), ttl).await;
        cache.set("todos:user:1:1:10", &json!(3), ttl).await;

        cache.delete_prefix("todos:all:").await;
        assert!(cache.get("todos:all:1:10").await.is_none());
        assert!(cache.get("todos:all:2:10").await.is_none());
        assert!(cache.get("todos:user:1:1:10").await.is_some());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let cache = MemoryCache::new();
        cache.set("short", &json!(1), Duration::from_millis(10)).await;
        cache.set("long", &json!(2), Duration::from_secs(60)).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        let removed = cache.cleanup_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_overwrite_resets_value() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("k", &json!(1), ttl).await;
        cache.set("k", &json!(2), ttl).await;

        assert_eq!(cache.get("k").await.unwrap(), json!(2));
        assert_eq!(cache.len().await, 1);
    }
}
