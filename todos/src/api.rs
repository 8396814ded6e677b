//! Todos API client.
//!
//! The slice talks to the server through the [`TodosApi`] trait so the
//! reducer, selectors, and tests never touch the network. [`HttpTodosApi`]
//! is the production implementation; `mocks::MockTodosApi` serves tests
//! and demos.
//!
//! Wire shapes (owned by the server, mirrored here):
//!
//! - `GET {base}/fakeApi/todos` → `{"todos": [Todo, ...]}`
//! - `POST {base}/fakeApi/todos` with `{"todo": {"text": "..."}}` →
//!   `{"todo": Todo}` (the server assigns id and default fields)

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::state::Todo;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Abstraction over the todos backend.
///
/// Implementations perform one request per call: no retry, no caching.
/// Errors are returned as-is; the caller decides what a failure means.
pub trait TodosApi: Send + Sync {
    /// Fetch the whole todo collection.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or
    /// a malformed body.
    fn fetch_todos(&self) -> impl Future<Output = Result<Vec<Todo>>> + Send;

    /// Create a todo from free text; the server returns the canonical
    /// record with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or
    /// a malformed body.
    fn create_todo(&self, text: &str) -> impl Future<Output = Result<Todo>> + Send;
}

/// Response envelope of the collection endpoint
#[derive(Debug, Deserialize)]
struct TodosResponse {
    todos: Vec<Todo>,
}

/// Request envelope of the create endpoint
#[derive(Debug, Serialize)]
struct NewTodoRequest<'a> {
    todo: NewTodo<'a>,
}

/// Draft sent to the create endpoint; the server fills in the rest
#[derive(Debug, Serialize)]
struct NewTodo<'a> {
    text: &'a str,
}

/// Response envelope of the create endpoint
#[derive(Debug, Deserialize)]
struct TodoResponse {
    todo: Todo,
}

/// HTTP implementation of [`TodosApi`] over `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTodosApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTodosApi {
    /// Create a client for the configured server
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/fakeApi/todos", self.base_url)
    }

    /// Map a response to `Ok` on success or a status error otherwise
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl TodosApi for HttpTodosApi {
    async fn fetch_todos(&self) -> Result<Vec<Todo>> {
        let response = self
            .client
            .get(self.endpoint())
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json::<TodosResponse>()
            .await
            .map(|body| body.todos)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create_todo(&self, text: &str) -> Result<Todo> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&NewTodoRequest {
                todo: NewTodo { text },
            })
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json::<TodoResponse>()
            .await
            .map(|body| body.todo)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Color, TodoId};

    #[test]
    fn collection_envelope_decodes() {
        let body = r#"{"todos": [
            {"id": "1", "text": "walk the dog", "completed": false, "color": null},
            {"id": "2", "text": "pay bills", "completed": true, "color": "blue"}
        ]}"#;

        let response: TodosResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.todos.len(), 2);
        assert_eq!(response.todos[0].id, TodoId::from("1"));
        assert_eq!(response.todos[1].color, Some(Color::Blue));
    }

    #[test]
    fn create_request_encodes_draft_only() {
        let body = serde_json::to_string(&NewTodoRequest {
            todo: NewTodo { text: "buy milk" },
        })
        .unwrap();

        assert_eq!(body, r#"{"todo":{"text":"buy milk"}}"#);
    }

    #[test]
    fn create_envelope_decodes() {
        let body = r#"{"todo": {"id": "42", "text": "buy milk"}}"#;
        let response: TodoResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.todo.id, TodoId::from("42"));
        assert!(!response.todo.completed);
    }

    #[test]
    fn endpoint_joins_base_url() {
        let api = HttpTodosApi::new(ApiConfig::new("http://example.test".to_string()));
        assert_eq!(api.endpoint(), "http://example.test/fakeApi/todos");
    }
}
