use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single item on the task list.
///
/// The store assigns `id` and `created_at` on insert; neither changes
/// afterwards. `text` is always stored trimmed and never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a todo.
///
/// `text` is optional here so that a missing field can be reported as a
/// validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodoInput {
    #[serde(default)]
    pub text: Option<String>,
}

/// Validated input handed to the store on insert.
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub text: String,
}

/// Partial update for a todo. Fields left as `None` are not touched.
///
/// Only `text` and `isCompleted` are accepted; any other field in a request
/// body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TodoPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            is_completed: None,
        }
    }

    pub fn completed(is_completed: bool) -> Self {
        Self {
            text: None,
            is_completed: Some(is_completed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.is_completed.is_none()
    }
}

/// Request body for updating a todo.
///
/// `text` is `None` when the field is absent and `Some(None)` when it is an
/// explicit `null`, which is a validation error rather than "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoInput {
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
