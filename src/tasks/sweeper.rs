//! Cache TTL sweeper
//!
//! Background task that periodically removes expired entries from the
//! in-process cache backend. Redis expires keys on its own, so the sweeper is
//! only spawned when the memory backend is selected.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns the periodic sweep loop.
///
/// Returns a JoinHandle which is aborted during graceful shutdown.
pub fn spawn_cache_sweeper(cache: MemoryCache, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting cache sweeper with interval of {interval_secs} seconds");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                info!("Cache sweep: removed {removed} expired entries");
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}
