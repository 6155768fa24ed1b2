//! Storage abstraction used by the HTTP handlers.

use async_trait::async_trait;

use crate::models::{Todo, TodoBase, TodoStatus};

/// Errors surfaced by a [`TodoRepository`].
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            other => RepositoryError::Database(other),
        }
    }
}

/// CRUD operations over the todo table.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Connect and bring the schema up to date.
    async fn init(&self) -> Result<(), RepositoryError>;

    /// Liveness probe against the backing store.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// All todos ordered by id.
    async fn get_all(&self) -> Result<Vec<Todo>, RepositoryError>;

    async fn get(&self, id: i64) -> Result<Todo, RepositoryError>;

    /// Persist a new todo and return it with id and timestamps set.
    async fn add(&self, base: TodoBase) -> Result<Todo, RepositoryError>;

    async fn set_status(&self, id: i64, status: TodoStatus) -> Result<(), RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Release any connections held by the repository.
    async fn shutdown(&self);
}
