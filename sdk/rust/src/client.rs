//! HTTP client for the todo API.

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error returned by [`TodoClient`] calls.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fields accepted when creating a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: i64,
}

/// A todo as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: i64,
    pub completed: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct StatusUpdate {
    completed: bool,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

/// Thin typed client for the todo API.
pub struct TodoClient {
    client: Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Build a client around an existing `reqwest::Client` (custom timeouts, pooling).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/todos{}", self.base_url, path)
    }

    /// List every todo.
    pub async fn list(&self) -> Result<Vec<Todo>, SdkError> {
        let resp = self.client.get(self.url("")).send().await?;
        decode(resp).await
    }

    /// Fetch a single todo by id.
    pub async fn get(&self, id: i64) -> Result<Todo, SdkError> {
        let resp = self.client.get(self.url(&format!("/{}", id))).send().await?;
        decode(resp).await
    }

    /// Create a todo and return the stored record.
    pub async fn add(&self, todo: &NewTodo) -> Result<Todo, SdkError> {
        let resp = self.client.post(self.url("")).json(todo).send().await?;
        decode(resp).await
    }

    /// Mark a todo as completed or not.
    pub async fn set_status(&self, id: i64, completed: bool) -> Result<(), SdkError> {
        let resp = self
            .client
            .put(self.url(&format!("/{}", id)))
            .json(&StatusUpdate { completed })
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    pub async fn delete(&self, id: i64) -> Result<(), SdkError> {
        let resp = self.client.delete(self.url(&format!("/{}", id))).send().await?;
        check(resp).await.map(|_| ())
    }
}

async fn check(resp: Response) -> Result<Response, SdkError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SdkError::Status {
        status,
        body: body.trim_end().to_string(),
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
    let text = check(resp).await?.text().await?;
    Ok(serde_json::from_str(&text)?)
}
