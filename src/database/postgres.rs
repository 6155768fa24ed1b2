//! PostgreSQL repository backed by a sqlx connection pool.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::database::repository::{RepositoryError, TodoRepository};
use crate::models::{Todo, TodoBase, TodoStatus};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id          BIGSERIAL PRIMARY KEY,
    title       TEXT        NOT NULL,
    description TEXT        NOT NULL DEFAULT '',
    priority    BIGINT      NOT NULL DEFAULT 1,
    completed   BOOLEAN     NOT NULL DEFAULT FALSE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const COLUMNS: &str = "id, title, description, priority, completed, created_at, updated_at";

pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// Build the pool without connecting; `init` opens the first connection.
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy_with(options);

        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn init(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::Migration)?;
        tracing::info!("todos table ready");
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[tracing::instrument(name = "db.get_all", skip_all)]
    async fn get_all(&self) -> Result<Vec<Todo>, RepositoryError> {
        let todos = sqlx::query_as::<_, Todo>(&format!("SELECT {COLUMNS} FROM todos ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    #[tracing::instrument(name = "db.get", skip(self))]
    async fn get(&self, id: i64) -> Result<Todo, RepositoryError> {
        sqlx::query_as::<_, Todo>(&format!("SELECT {COLUMNS} FROM todos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    #[tracing::instrument(name = "db.add", skip_all)]
    async fn add(&self, base: TodoBase) -> Result<Todo, RepositoryError> {
        let priority = base.effective_priority();
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, description, priority) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(base.title)
        .bind(base.description)
        .bind(priority)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    #[tracing::instrument(name = "db.set_status", skip(self))]
    async fn set_status(&self, id: i64, status: TodoStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE todos SET completed = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status.completed)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "db.delete", skip(self))]
    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn shutdown(&self) {
        self.pool.close().await;
    }
}
