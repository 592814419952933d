//! Domain types and request/response models for the todo service
//!
//! `domain` holds the persisted entities, `requests`/`responses` the DTOs used
//! for serializing/deserializing HTTP bodies.

pub mod domain;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use domain::{AuthToken, Role, Todo, TodoStatus, User};
pub use requests::{
    CreateTodoRequest, ListParams, LoginRequest, RefreshRequest, RegisterRequest,
    UpdatePasswordRequest, UpdateRoleRequest, UpdateTodoRequest,
};
pub use responses::{
    CreatedUserResponse, HealthResponse, MessageResponse, PaginatedTodos, Pagination,
    TodoResponse, TokenPairResponse, UserSummary, UsersListResponse,
};
