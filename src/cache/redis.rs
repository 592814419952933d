//! Redis cache backend
//!
//! Wraps a multiplexed connection manager. All operations honor the
//! best-effort contract: any Redis error is logged at warn and treated as a
//! miss (`get`) or a no-op (`set`/`delete`).

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::warn;

use crate::cache::Cache;

// == Redis Cache ==
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis. The manager reconnects on its own after transient
    /// failures, so this is the only fallible call.
    pub async fn connect(url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("cache get failed for {key}: {err}");
                return None;
            }
        };
        raw.and_then(|payload| serde_json::from_str(&payload).ok())
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) {
        let mut conn = self.conn.clone();
        let payload = value.to_string();
        if let Err(err) = conn
            .set_ex::<_, _, ()>(key, payload, ttl.as_secs())
            .await
        {
            warn!("cache set failed for {key}: {err}");
        }
    }

    async fn delete(&self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }
        let mut conn = self.conn.clone();
        if let Err(err) = conn.del::<_, ()>(keys.to_vec()).await {
            warn!("cache delete failed: {err}");
        }
    }

    async fn delete_prefix(&self, prefix: &str) {
        // SCAN first, then a separate DEL; the scan iterator holds the
        // connection mutably for its whole lifetime.
        let pattern = format!("{prefix}*");
        let mut scan_conn = self.conn.clone();
        let keys: Vec<String> = match scan_conn.scan_match::<_, String>(&pattern).await {
            Ok(mut iter) => {
                let mut keys = Vec::new();
                while let Some(key) = iter.next_item().await {
                    keys.push(key);
                }
                keys
            }
            Err(err) => {
                warn!("cache scan failed for {pattern}: {err}");
                return;
            }
        };
        self.delete(&keys).await;
    }
}
