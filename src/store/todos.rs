//! Todo store
//!
//! CRUD plus paginated listing over the todos table. "Not found" on update
//! and delete is a normal outcome (None/false), never an error.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;

use crate::error::{ApiError, Result};
use crate::models::{CreateTodoRequest, Todo, TodoStatus, UpdateTodoRequest};

const SELECT_TODO: &str = "SELECT id, item, status, created_at, user_id FROM todos";

// == Todo Store ==
#[derive(Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // == Create ==
    /// Inserts a todo with a caller-supplied id. The creation timestamp is
    /// server-assigned and the owner is the resolved caller (None for legacy
    /// callers).
    pub async fn create(&self, req: &CreateTodoRequest, user_id: Option<i64>) -> Result<Todo> {
        let todo = Todo {
            id: req.id,
            item: req.item.clone(),
            status: req.status.unwrap_or_default(),
            created_at: Utc::now(),
            user_id,
        };

        let inserted = sqlx::query(
            "INSERT INTO todos (id, item, status, created_at, user_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(todo.id)
        .bind(&todo.item)
        .bind(todo.status)
        .bind(todo.created_at)
        .bind(todo.user_id)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(todo),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(ApiError::conflict(format!("Todo {} already exists", req.id)))
            }
            Err(err) => Err(err.into()),
        }
    }

    // == Get ==
    pub async fn get(&self, id: i64) -> std::result::Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!("{SELECT_TODO} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    // == List ==
    /// Returns one page in ascending id order along with the total matching
    /// count. `owner = None` is the unfiltered admin scope. Page/size bounds
    /// are enforced at the API boundary; the offset saturates so an extreme
    /// page yields an empty result rather than overflowing.
    pub async fn list(
        &self,
        page: i64,
        size: i64,
        owner: Option<i64>,
    ) -> std::result::Result<(Vec<Todo>, i64), sqlx::Error> {
        let offset = page.saturating_sub(1).saturating_mul(size);

        let (items, total) = match owner {
            None => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
                    .fetch_one(&self.pool)
                    .await?;
                let items = sqlx::query_as::<_, Todo>(&format!(
                    "{SELECT_TODO} ORDER BY id ASC LIMIT ? OFFSET ?"
                ))
                .bind(size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                (items, total)
            }
            Some(user_id) => {
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE user_id = ?")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await?;
                let items = sqlx::query_as::<_, Todo>(&format!(
                    "{SELECT_TODO} WHERE user_id = ? ORDER BY id ASC LIMIT ? OFFSET ?"
                ))
                .bind(user_id)
                .bind(size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                (items, total)
            }
        };

        Ok((items, total))
    }

    // == Update ==
    /// Updates item text and (optionally) status. Returns the new row, or
    /// None when the id does not exist.
    pub async fn update(
        &self,
        id: i64,
        req: &UpdateTodoRequest,
    ) -> std::result::Result<Option<Todo>, sqlx::Error> {
        let result = match req.status {
            Some(status) => {
                sqlx::query("UPDATE todos SET item = ?, status = ? WHERE id = ?")
                    .bind(&req.item)
                    .bind(status)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("UPDATE todos SET item = ? WHERE id = ?")
                    .bind(&req.item)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    // == Delete ==
    /// Removes a todo. Returns the deleted row's owner (`Some(None)` for an
    /// unowned todo), or `None` when the id did not exist. Reading the owner
    /// out of the DELETE itself keeps cache invalidation in step with the row
    /// that was actually removed.
    pub async fn delete(&self, id: i64) -> std::result::Result<Option<Option<i64>>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<i64>>("DELETE FROM todos WHERE id = ? RETURNING user_id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connect_memory;

    async fn test_store() -> TodoStore {
        TodoStore::new(connect_memory().await.unwrap())
    }

    fn create_req(id: i64, item: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            id,
            item: item.to_string(),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = test_store().await;
        store.create(&create_req(1, "first"), Some(7)).await.unwrap();

        let todo = store.get(1).await.unwrap().unwrap();
        assert_eq!(todo.item, "first");
        assert_eq!(todo.status, TodoStatus::Pending);
        assert_eq!(todo.user_id, Some(7));
    }

    #[tokio::test]
    async fn test_create_duplicate_id_conflicts() {
        let store = test_store().await;
        store.create(&create_req(1, "first"), None).await.unwrap();

        let result = store.create(&create_req(1, "again"), None).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = test_store().await;
        assert!(store.get(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_none_not_error() {
        let store = test_store().await;
        let req = UpdateTodoRequest {
            item: "x".to_string(),
            status: None,
        };
        assert!(store.update(99, &req).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_none_not_error() {
        let store = test_store().await;
        assert!(store.delete(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_the_removed_owner() {
        let store = test_store().await;
        store.create(&create_req(1, "owned"), Some(7)).await.unwrap();
        store.create(&create_req(2, "unowned"), None).await.unwrap();

        assert_eq!(store.delete(1).await.unwrap(), Some(Some(7)));
        assert_eq!(store.delete(2).await.unwrap(), Some(None));
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_changes_item_and_status() {
        let store = test_store().await;
        store.create(&create_req(5, "old"), None).await.unwrap();

        let req = UpdateTodoRequest {
            item: "new".to_string(),
            status: Some(TodoStatus::Done),
        };
        let updated = store.update(5, &req).await.unwrap().unwrap();
        assert_eq!(updated.item, "new");
        assert_eq!(updated.status, TodoStatus::Done);
    }

    #[tokio::test]
    async fn test_pagination_windows() {
        let store = test_store().await;
        for id in 1..=25 {
            store.create(&create_req(id, &format!("item {id}")), None).await.unwrap();
        }

        let (page1, total) = store.list(1, 10, None).await.unwrap();
        assert_eq!(total, 25);
        assert_eq!(page1.len(), 10);
        assert_eq!(page1.first().unwrap().id, 1);
        assert_eq!(page1.last().unwrap().id, 10);

        let (page3, _) = store.list(3, 10, None).await.unwrap();
        assert_eq!(page3.len(), 5);
        assert_eq!(page3.first().unwrap().id, 21);

        // Beyond-range pages are empty with the total unchanged
        let (page9, total) = store.list(9, 10, None).await.unwrap();
        assert!(page9.is_empty());
        assert_eq!(total, 25);
    }

    #[tokio::test]
    async fn test_extreme_page_saturates_instead_of_overflowing() {
        let store = test_store().await;
        store.create(&create_req(1, "only"), None).await.unwrap();

        let (items, total) = store.list(i64::MAX, 100, None).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_owner_filter() {
        let store = test_store().await;
        store.create(&create_req(1, "mine"), Some(1)).await.unwrap();
        store.create(&create_req(2, "theirs"), Some(2)).await.unwrap();
        store.create(&create_req(3, "nobody's"), None).await.unwrap();

        let (all, total) = store.list(1, 10, None).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(all.len(), 3);

        let (mine, total) = store.list(1, 10, Some(1)).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(mine.first().unwrap().id, 1);
    }
}
