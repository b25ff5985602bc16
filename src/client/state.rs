//! Client application state.
//!
//! [`AppState`] is a plain serializable value. It only changes through the
//! transition methods below; the async ones issue exactly one API call and
//! fold the outcome back into the state. Failures never retry: they leave the
//! task list as it was, raise an error notification and log the cause.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::http::{ClientError, TodoApi};
use crate::models::{Todo, TodoPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message about the last action.
///
/// `seq` identifies this notification so that a late dismissal cannot clear a
/// newer one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub seq: u64,
    pub message: String,
    pub kind: NotificationKind,
}

/// The task currently being edited in place, with its draft text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditState {
    pub id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    todos: Vec<Todo>,
    draft: String,
    loading: bool,
    notification: Option<Notification>,
    editing: Option<EditState>,
    next_seq: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    // ============================================================
    // Load
    // ============================================================

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn finish_load(&mut self, result: Result<Vec<Todo>, ClientError>) {
        match result {
            Ok(todos) => self.todos = todos,
            Err(e) => {
                tracing::error!("Fetch error: {}", e);
                self.todos.clear();
                self.notify_error("Could not fetch todos. Check the server.");
            }
        }
        self.loading = false;
    }

    pub async fn load(&mut self, api: &dyn TodoApi) {
        self.begin_load();
        let result = api.list().await;
        self.finish_load(result);
    }

    // ============================================================
    // Add
    // ============================================================

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Create a todo from the draft. A blank draft never reaches the API.
    pub async fn add(&mut self, api: &dyn TodoApi) {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            self.notify_error("Write something first!");
            return;
        }

        match api.create(&text).await {
            Ok(todo) => {
                self.todos.insert(0, todo);
                self.draft.clear();
                self.notify_success("New todo added!");
            }
            Err(e) => {
                tracing::error!("Add error: {}", e);
                self.notify_error("Todo was not added.");
            }
        }
    }

    // ============================================================
    // Complete
    // ============================================================

    pub async fn toggle_complete(&mut self, api: &dyn TodoApi, id: Uuid) {
        let Some(current) = self.todos.iter().find(|t| t.id == id) else {
            tracing::warn!(%id, "Toggle requested for a todo that is not in the list");
            return;
        };
        let is_completed = !current.is_completed;

        match api.update(id, &TodoPatch::completed(is_completed)).await {
            Ok(updated) => {
                self.replace(updated);
                self.notify_success(if is_completed {
                    "Task completed"
                } else {
                    "Task marked incomplete"
                });
            }
            Err(e) => {
                tracing::error!("Update error: {}", e);
                self.notify_error("Update failed.");
            }
        }
    }

    // ============================================================
    // Edit
    // ============================================================

    pub fn start_edit(&mut self, id: Uuid) {
        if let Some(todo) = self.todos.iter().find(|t| t.id == id) {
            self.editing = Some(EditState {
                id,
                text: todo.text.clone(),
            });
        }
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.text = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save the edit draft. The edit is closed whether or not the API accepts
    /// it; only a blank draft keeps it open.
    pub async fn save_edit(&mut self, api: &dyn TodoApi) {
        let Some(edit) = self.editing.as_ref() else {
            return;
        };

        let id = edit.id;
        let text = edit.text.trim().to_string();
        if text.is_empty() {
            self.notify_error("Text cannot be left empty!");
            return;
        }

        let result = api.update(id, &TodoPatch::text(text)).await;
        self.editing = None;

        match result {
            Ok(updated) => {
                self.replace(updated);
                self.notify_success("Todo edited!");
            }
            Err(e) => {
                tracing::error!("Save edit error: {}", e);
                self.notify_error("Edit was not saved.");
            }
        }
    }

    // ============================================================
    // Delete
    // ============================================================

    pub async fn delete(&mut self, api: &dyn TodoApi, id: Uuid) {
        match api.delete(id).await {
            Ok(()) => {
                self.todos.retain(|t| t.id != id);
                if self.editing.as_ref().is_some_and(|e| e.id == id) {
                    self.editing = None;
                }
                self.notify_success("Todo deleted.");
            }
            Err(e) => {
                tracing::error!("Delete error: {}", e);
                self.notify_error("Delete failed.");
            }
        }
    }

    // ============================================================
    // Notifications
    // ============================================================

    /// Clear the notification if it is still the one numbered `seq`.
    pub fn dismiss_notification(&mut self, seq: u64) -> bool {
        if self.notification.as_ref().is_some_and(|n| n.seq == seq) {
            self.notification = None;
            true
        } else {
            false
        }
    }

    fn notify_success(&mut self, message: &str) {
        self.notify(message, NotificationKind::Success);
    }

    fn notify_error(&mut self, message: &str) {
        self.notify(message, NotificationKind::Error);
    }

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.next_seq += 1;
        self.notification = Some(Notification {
            seq: self.next_seq,
            message: message.to_string(),
            kind,
        });
    }

    fn replace(&mut self, updated: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
        }
    }
}
