//! The todo item and its request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority stored when the client does not send one.
pub const DEFAULT_PRIORITY: i64 = 1;

/// User-supplied fields of a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoBase {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: i64,
}

impl TodoBase {
    /// Priority to persist; zero falls back to the column default.
    pub fn effective_priority(&self) -> i64 {
        if self.priority == 0 {
            DEFAULT_PRIORITY
        } else {
            self.priority
        }
    }
}

/// A stored todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: TodoBase,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,

    pub completed: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Body of a status update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStatus {
    #[serde(default)]
    pub completed: bool,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
