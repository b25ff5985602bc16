use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::error::ApiError;
use crate::db::{Database, BLANK_TEXT_MESSAGE};
use crate::models::*;

/// Message used when a create request carries no text at all.
pub const TEXT_REQUIRED_MESSAGE: &str = "Todo text is required";

/// A path segment that is not a valid id cannot name any todo.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::todo_not_found())
}

// ============================================================
// Health
// ============================================================

pub async fn root() -> &'static str {
    "Todo API is running"
}

// ============================================================
// Todos
// ============================================================

pub async fn list_todos(State(db): State<Database>) -> Result<Json<Vec<Todo>>, ApiError> {
    db.list_todos().map(Json).map_err(ApiError::from)
}

pub async fn create_todo(
    State(db): State<Database>,
    payload: Result<Json<CreateTodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(input) = payload.map_err(ApiError::invalid_body)?;

    // Presence only; blank-after-trim is the store's call.
    let text = match input.text {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ApiError::Validation(TEXT_REQUIRED_MESSAGE.to_string())),
    };

    let todo = db.insert_todo(CreateTodo { text })?;
    tracing::info!(id = %todo.id, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(db): State<Database>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoInput>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(input) = payload.map_err(ApiError::invalid_body)?;

    let text = match input.text {
        Some(None) => return Err(ApiError::Validation(TEXT_REQUIRED_MESSAGE.to_string())),
        Some(Some(text)) if text.trim().is_empty() => {
            return Err(ApiError::Validation(BLANK_TEXT_MESSAGE.to_string()))
        }
        text => text.flatten(),
    };
    let patch = TodoPatch {
        text,
        is_completed: input.is_completed,
    };

    let id = parse_id(&id)?;
    let todo = db
        .update_todo(id, patch)?
        .ok_or_else(ApiError::todo_not_found)?;

    tracing::info!(id = %todo.id, completed = todo.is_completed, "Updated todo");
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let removed = db.delete_todo(id)?.ok_or_else(ApiError::todo_not_found)?;

    tracing::info!(id = %removed.id, "Deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
