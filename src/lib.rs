//! Todo Service - a CRUD API with bearer/role authentication
//!
//! Bearer tokens (signed or legacy opaque) resolve to a caller with an
//! effective role; capability checks gate each endpoint; reads go through a
//! best-effort cache that writes invalidate.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{ApiError, Result};
