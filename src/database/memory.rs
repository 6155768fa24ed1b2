//! Process-local repository.
//!
//! Keeps todos in a `BTreeMap` behind an async `RwLock`. Ids start at 1 and
//! are never reused, matching a serial primary key.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::repository::{RepositoryError, TodoRepository};
use crate::models::{Todo, TodoBase, TodoStatus};

#[derive(Debug)]
pub struct InMemoryTodoRepository {
    todos: RwLock<BTreeMap<i64, Todo>>,
    next_id: AtomicI64,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self {
            todos: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn init(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Todo>, RepositoryError> {
        Ok(self.todos.read().await.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Todo, RepositoryError> {
        self.todos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn add(&self, base: TodoBase) -> Result<Todo, RepositoryError> {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let priority = base.effective_priority();
        let todo = Todo {
            base: TodoBase { priority, ..base },
            id,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.todos.write().await.insert(id, todo.clone());
        Ok(todo)
    }

    async fn set_status(&self, id: i64, status: TodoStatus) -> Result<(), RepositoryError> {
        let mut todos = self.todos.write().await;
        let todo = todos.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        todo.completed = status.completed;
        todo.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.todos
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn shutdown(&self) {}
}
