//! Todo API handlers.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::http::request::TodoId;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::models::{Todo, TodoBase, TodoStatus};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /`
pub async fn index() -> &'static str {
    "Welcome to TODO API"
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let version = env!("CARGO_PKG_VERSION");
    match state.repository.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                version,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    version,
                }),
            )
        }
    }
}

/// `POST /api/v1/todos`
pub async fn add_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let base: TodoBase = serde_json::from_slice(&body)?;
    let todo = state.repository.add(base).await?;
    tracing::debug!(id = todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `GET /api/v1/todos`
pub async fn get_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.repository.get_all().await?))
}

/// `GET /api/v1/todos/{id}`
pub async fn get_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.repository.get(id).await?))
}

/// `PUT /api/v1/todos/{id}`
pub async fn update_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let status: TodoStatus = serde_json::from_slice(&body)?;
    state.repository.set_status(id, status).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/v1/todos/{id}`
pub async fn delete_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<StatusCode, ApiError> {
    state.repository.delete(id).await?;
    tracing::debug!(id, "Todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
