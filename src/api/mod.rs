//! API Module
//!
//! HTTP handlers and routing for the todo service REST API. Each write
//! handler follows the same sequence: resolve the bearer token, check the
//! required capability, perform the store operation, invalidate the cache.

pub mod auth;
pub mod routes;
pub mod state;
pub mod todos;
pub mod users;

pub use routes::create_router;
pub use state::AppState;
