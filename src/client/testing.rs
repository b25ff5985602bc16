//! In-memory [`TodoApi`] used by the client tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::http::{ClientError, TodoApi};
use crate::models::{Todo, TodoPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    BadRequest,
    NotFound,
    Server,
}

impl Failure {
    fn error(self) -> ClientError {
        match self {
            Self::BadRequest => ClientError::BadRequest("rejected".to_string()),
            Self::NotFound => ClientError::NotFound("missing".to_string()),
            Self::Server => ClientError::Server("500 Internal Server Error".to_string()),
        }
    }
}

/// Records every call it receives and fails all of them once told to.
#[derive(Default)]
pub struct FakeApi {
    todos: Mutex<Vec<Todo>>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<Failure>>,
}

impl FakeApi {
    /// Seed with todos created in the given order, one second apart.
    pub fn with_todos(texts: &[&str]) -> Self {
        let start = Utc::now() - Duration::hours(1);
        let todos = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Todo {
                id: Uuid::new_v4(),
                text: text.to_string(),
                is_completed: false,
                created_at: start + Duration::seconds(i as i64),
            })
            .collect();

        Self {
            todos: Mutex::new(todos),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        match *self.failure.lock().unwrap() {
            Some(failure) => Err(failure.error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TodoApi for FakeApi {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        self.record("list".to_string())?;
        let mut todos = self.todos.lock().unwrap().clone();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    async fn create(&self, text: &str) -> Result<Todo, ClientError> {
        self.record(format!("create {text}"))?;
        let todo = Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            is_completed: false,
            created_at: Utc::now(),
        };
        self.todos.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo, ClientError> {
        let mut call = format!("update {id}");
        if let Some(text) = &patch.text {
            call.push_str(&format!(" text={text}"));
        }
        if let Some(done) = patch.is_completed {
            call.push_str(&format!(" completed={done}"));
        }
        self.record(call)?;

        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound("Todo not found".to_string()))?;
        if let Some(text) = &patch.text {
            todo.text = text.clone();
        }
        if let Some(done) = patch.is_completed {
            todo.is_completed = done;
        }
        Ok(todo.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.record(format!("delete {id}"))?;
        let mut todos = self.todos.lock().unwrap();
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return Err(ClientError::NotFound("Todo not found".to_string()));
        }
        Ok(())
    }
}
