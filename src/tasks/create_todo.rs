//! Asynchronous todo creation
//!
//! The offloaded job behind POST /todos/async: the same create + cache
//! invalidation path as the synchronous endpoint, run outside the request.
//! In eager mode the handler awaits the job inline before replying 202.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{self, Cache};
use crate::error::Result;
use crate::models::CreateTodoRequest;
use crate::store::TodoStore;

/// Runs the create job: insert, then invalidate the affected cache scopes.
pub async fn run_create_job(
    todos: &TodoStore,
    cache: &dyn Cache,
    req: &CreateTodoRequest,
    owner: Option<i64>,
) -> Result<()> {
    let todo = todos.create(req, owner).await?;
    cache::invalidate_todo(cache, todo.id, todo.user_id).await;
    info!("queued create finished for todo {}", todo.id);
    Ok(())
}

/// Spawns the job detached. Failures are logged, not reported to the caller;
/// the 202 response only acknowledges the enqueue.
pub fn spawn_create_job(
    todos: TodoStore,
    cache: Arc<dyn Cache>,
    req: CreateTodoRequest,
    owner: Option<i64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = run_create_job(&todos, cache.as_ref(), &req, owner).await {
            warn!("queued create failed for todo {}: {err}", req.id);
        }
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::store::connect_memory;
    use serde_json::json;
    use std::time::Duration;

    fn req(id: i64) -> CreateTodoRequest {
        CreateTodoRequest {
            id,
            item: format!("item {id}"),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_run_create_job_inserts_and_invalidates() {
        let todos = TodoStore::new(connect_memory().await.unwrap());
        let cache = MemoryCache::new();
        // Prime a stale entry that the job must drop
        cache
            .set(&cache::todo_key(11), &json!({"stale": true}), Duration::from_secs(60))
            .await;

        run_create_job(&todos, &cache, &req(11), Some(2)).await.unwrap();

        assert!(todos.get(11).await.unwrap().is_some());
        assert!(cache.get(&cache::todo_key(11)).await.is_none());
    }

    #[tokio::test]
    async fn test_spawned_job_completes() {
        let todos = TodoStore::new(connect_memory().await.unwrap());
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());

        let handle = spawn_create_job(todos.clone(), cache, req(5), None);
        handle.await.unwrap();

        assert!(todos.get(5).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_id_failure_is_swallowed() {
        let todos = TodoStore::new(connect_memory().await.unwrap());
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
        todos.create(&req(5), None).await.unwrap();

        // The detached job logs the conflict instead of panicking
        let handle = spawn_create_job(todos.clone(), cache, req(5), None);
        handle.await.unwrap();
    }
}
