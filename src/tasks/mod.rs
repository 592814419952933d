//! Background Tasks Module
//!
//! Tasks that run outside the request cycle:
//! - Cache sweeper: reclaims expired in-process cache entries periodically
//! - Todo create jobs: the async-create offload path

pub mod create_todo;
pub mod sweeper;

pub use create_todo::{run_create_job, spawn_create_job};
pub use sweeper::spawn_cache_sweeper;
