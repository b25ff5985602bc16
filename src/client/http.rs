//! HTTP client for the todo API.
//!
//! The base URL is the todo collection itself, e.g.
//! `http://localhost:5000/api/todos`; instance URLs are `{base}/{id}`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::models::*;

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// The four todo operations the client state depends on.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ClientError>;
    async fn create(&self, text: &str) -> Result<Todo, ClientError>;
    async fn update(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    client: Client,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todo_url(&self, id: Uuid) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(error_for(status, response).await)
        }
    }

    /// Handle response that returns no body (204 No Content).
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_for(status, response).await)
        }
    }
}

async fn error_for(status: StatusCode, response: reqwest::Response) -> ClientError {
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(body),
        StatusCode::BAD_REQUEST => ClientError::BadRequest(body),
        _ => ClientError::Server(format!("{}: {}", status, body)),
    }
}

#[async_trait]
impl TodoApi for TodoClient {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.client.get(&self.base_url).send().await?;
        self.handle_response(response).await
    }

    async fn create(&self, text: &str) -> Result<Todo, ClientError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(&CreateTodoInput {
                text: Some(text.to_string()),
            })
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn update(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo, ClientError> {
        let response = self
            .client
            .put(self.todo_url(id))
            .json(patch)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self.client.delete(self.todo_url(id)).send().await?;
        self.handle_empty_response(response).await
    }
}
