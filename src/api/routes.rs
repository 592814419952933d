//! API Routes
//!
//! Configures the axum router with all service endpoints.

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::models::HealthResponse;

use super::auth::{login_handler, refresh_handler, register_handler};
use super::state::AppState;
use super::todos::{
    create_todo_async_handler, create_todo_handler, delete_todo_handler, get_todo_handler,
    list_todos_handler, update_todo_handler,
};
use super::users::{
    get_user_handler, list_users_handler, update_password_handler, update_role_handler,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/v1/auth/register` - Create a user (first one becomes admin)
/// - `POST /api/v1/auth/login` - Exchange credentials for a token pair
/// - `POST /api/v1/auth/refresh` - Rotate a refresh token
/// - `GET /api/v1/auth/users` - List active users (admin)
/// - `GET /api/v1/auth/users/:id` - Look up a user (admin)
/// - `PATCH /api/v1/auth/users/:id/role` - Change a user's role (admin)
/// - `PATCH /api/v1/auth/users/:id/password` - Change a password (admin or self)
/// - `GET /api/v1/todos` - Paginated todo listing (any valid token)
/// - `GET /api/v1/todos/:id` - Single todo (any valid token)
/// - `POST /api/v1/todos` - Create a todo (editor)
/// - `POST /api/v1/todos/async` - Enqueue a todo creation, 202 (editor)
/// - `PUT /api/v1/todos/:id` - Update a todo (editor)
/// - `DELETE /api/v1/todos/:id` - Delete a todo (admin)
/// - `GET /health` - Health check, no auth
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/auth/register", post(register_handler))
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/auth/refresh", post(refresh_handler))
        .route("/api/v1/auth/users", get(list_users_handler))
        .route("/api/v1/auth/users/:id", get(get_user_handler))
        .route("/api/v1/auth/users/:id/role", patch(update_role_handler))
        .route(
            "/api/v1/auth/users/:id/password",
            patch(update_password_handler),
        )
        .route(
            "/api/v1/todos",
            get(list_todos_handler).post(create_todo_handler),
        )
        .route("/api/v1/todos/async", post(create_todo_async_handler))
        .route(
            "/api/v1/todos/:id",
            get(get_todo_handler)
                .put(update_todo_handler)
                .delete(delete_todo_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::Config;
    use crate::store;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn create_test_app() -> Router {
        let pool = store::connect_memory().await.unwrap();
        let state = AppState::new(Config::default(), pool, Arc::new(MemoryCache::new()));
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_todos_require_token() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/todos")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
