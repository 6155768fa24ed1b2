//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handlers
//!     → repository.rs (TodoRepository trait, RepositoryError)
//!     → postgres.rs (sqlx PgPool, `todos` table)
//!       or memory.rs (BTreeMap, tests and local runs)
//! ```
//!
//! # Design Decisions
//! - Handlers only see `Arc<dyn TodoRepository>`
//! - Missing rows surface as `RepositoryError::NotFound` from every backend
//! - The schema is created on `init`, not at construction

pub mod memory;
pub mod postgres;
pub mod repository;

use std::sync::Arc;

use crate::config::{DatabaseConfig, StorageBackend};

pub use memory::InMemoryTodoRepository;
pub use postgres::PostgresTodoRepository;
pub use repository::{RepositoryError, TodoRepository};

/// Build the repository selected by `config.backend`.
pub fn from_config(config: &DatabaseConfig) -> Arc<dyn TodoRepository> {
    match config.backend {
        StorageBackend::Postgres => Arc::new(PostgresTodoRepository::new(config)),
        StorageBackend::Memory => Arc::new(InMemoryTodoRepository::new()),
    }
}
