//! Persistence layer
//!
//! SQLite-backed stores for credentials and todos, plus pool/schema setup.

pub mod db;
pub mod todos;
pub mod users;

pub use db::{connect, connect_memory, init_schema};
pub use todos::TodoStore;
pub use users::UserStore;
