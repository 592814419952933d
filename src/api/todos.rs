//! Todo endpoints
//!
//! Reads are cached read-through per scope; writes mutate the store and then
//! invalidate the affected cache entries. Create/update require the editor
//! capability, delete is admin-exclusive. A missing id on get/update/delete
//! is a normal message outcome, not an error.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::cache;
use crate::error::{ApiError, Result};
use crate::models::{
    CreateTodoRequest, ListParams, MessageResponse, PaginatedTodos, Pagination, Role,
    TodoResponse, UpdateTodoRequest,
};
use crate::tasks;

use super::state::AppState;

const NOT_FOUND: &str = "todo not found";

/// Handler for GET /api/v1/todos
///
/// Read path: scope key lookup first; on a hit the cached payload is returned
/// verbatim. On a miss the page is queried, cached and returned. Non-admin
/// callers only ever see (and cache) their own todos.
pub async fn list_todos_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    let (page, size) = params.validated().map_err(ApiError::validation)?;

    let key = cache::list_key(&caller.list_scope(), page, size);
    if let Some(cached) = state.cache.get(&key).await {
        return Ok(Json(cached).into_response());
    }

    let (todos, total) = state.todos.list(page, size, caller.owner_filter()).await?;
    let payload = PaginatedTodos {
        todos,
        pagination: Pagination::new(total, page, size),
    };
    cache_payload(&state, &key, &payload).await;
    Ok(Json(payload).into_response())
}

/// Handler for GET /api/v1/todos/:id
pub async fn get_todo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Response> {
    state.resolver.resolve_bearer(&headers).await?;

    let key = cache::todo_key(id);
    if let Some(cached) = state.cache.get(&key).await {
        return Ok(Json(json!({ "todo": cached })).into_response());
    }

    match state.todos.get(id).await? {
        Some(todo) => {
            cache_payload(&state, &key, &todo).await;
            Ok(Json(TodoResponse { todo }).into_response())
        }
        None => Ok(Json(MessageResponse::new(NOT_FOUND)).into_response()),
    }
}

/// Handler for POST /api/v1/todos (editor)
pub async fn create_todo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    caller.authorize(Role::Editor)?;

    let todo = state.todos.create(&req, caller.user_id).await?;
    cache::invalidate_todo(state.cache.as_ref(), todo.id, todo.user_id).await;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("todo created"))))
}

/// Handler for POST /api/v1/todos/async (editor)
///
/// Enqueue-and-return-202: the create job runs detached and its failures are
/// only logged. With `eager_tasks` the job is awaited inline first, so tests
/// observe the todo immediately after the 202.
pub async fn create_todo_async_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    caller.authorize(Role::Editor)?;

    if state.config.eager_tasks {
        if let Err(err) =
            tasks::run_create_job(&state.todos, state.cache.as_ref(), &req, caller.user_id).await
        {
            warn!("eager create job failed for todo {}: {err}", req.id);
        }
    } else {
        tasks::spawn_create_job(
            state.todos.clone(),
            state.cache.clone(),
            req,
            caller.user_id,
        );
    }

    Ok((StatusCode::ACCEPTED, Json(MessageResponse::new("enqueued"))))
}

/// Handler for PUT /api/v1/todos/:id (editor)
///
/// On success the per-id cache entry is refreshed with the new snapshot and
/// the affected list scopes are swept.
pub async fn update_todo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Response> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    caller.authorize(Role::Editor)?;

    match state.todos.update(id, &req).await? {
        Some(todo) => {
            cache_payload(&state, &cache::todo_key(id), &todo).await;
            cache::invalidate_lists(state.cache.as_ref(), todo.user_id).await;
            Ok(Json(TodoResponse { todo }).into_response())
        }
        None => Ok(Json(MessageResponse::new(NOT_FOUND)).into_response()),
    }
}

/// Handler for DELETE /api/v1/todos/:id (admin-exclusive)
pub async fn delete_todo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    let caller = state.resolver.resolve_bearer(&headers).await?;
    caller.authorize(Role::Admin)?;

    // The store returns the removed row's owner, which decides the list
    // scope to sweep besides "all".
    match state.todos.delete(id).await? {
        Some(owner) => {
            cache::invalidate_todo(state.cache.as_ref(), id, owner).await;
            Ok(Json(MessageResponse::new("todo deleted")))
        }
        None => Ok(Json(MessageResponse::new(NOT_FOUND))),
    }
}

/// Serializes and stores a payload, best-effort.
async fn cache_payload<T: serde::Serialize>(state: &AppState, key: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => state.cache.set(key, &value, state.cache_ttl()).await,
        Err(err) => warn!("failed to serialize cache payload for {key}: {err}"),
    }
}
