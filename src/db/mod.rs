mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{types::Type, Connection, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::models::*;

/// Message used when a todo's text is blank after trimming.
pub const BLANK_TEXT_MESSAGE: &str = "Todo text cannot be blank";

/// Errors raised by todo operations on the store.
#[derive(Debug, Error)]
pub enum DbError {
    /// A record failed validation and was not written.
    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Handle to the todo store. Clones share the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

const TODO_COLUMNS: &str = "id, text, is_completed, created_at";

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "tasklist")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("tasklist.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the store named by a connection string.
    ///
    /// Accepts `:memory:`, `sqlite::memory:`, `sqlite://<path>` or a bare path.
    pub fn open_url(url: &str) -> Result<Self> {
        match url.trim() {
            "" => Err(anyhow::anyhow!("Database connection string is empty")),
            ":memory:" | "sqlite::memory:" => Self::open_memory(),
            other => {
                let path = other.strip_prefix("sqlite://").unwrap_or(other);
                Self::open(PathBuf::from(path))
            }
        }
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Todo operations
    // ============================================================

    /// All todos, newest first.
    pub fn list_todos(&self) -> Result<Vec<Todo>, DbError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at DESC, rowid DESC"
        ))?;

        let todos = stmt
            .query_map([], row_to_todo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(todos)
    }

    pub fn get_todo(&self, id: Uuid) -> Result<Option<Todo>, DbError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        fetch_todo(&conn, id)
    }

    pub fn insert_todo(&self, input: CreateTodo) -> Result<Todo, DbError> {
        let text = validate_text(&input.text)?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let todo = Todo {
            id: Uuid::new_v4(),
            text,
            is_completed: false,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO todos (id, text, is_completed, created_at) VALUES (?, ?, ?, ?)",
            (
                todo.id.to_string(),
                &todo.text,
                todo.is_completed as i32,
                format_datetime(&todo.created_at),
            ),
        )?;

        Ok(todo)
    }

    /// Apply the supplied fields of `patch` to the todo with `id`.
    ///
    /// Returns `Ok(None)` when no such todo exists.
    pub fn update_todo(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, DbError> {
        let text = patch.text.as_deref().map(validate_text).transpose()?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let Some(existing) = fetch_todo(&conn, id)? else {
            return Ok(None);
        };

        let text = text.unwrap_or(existing.text);
        let is_completed = patch.is_completed.unwrap_or(existing.is_completed);

        conn.execute(
            "UPDATE todos SET text = ?, is_completed = ? WHERE id = ?",
            (&text, is_completed as i32, id.to_string()),
        )?;

        Ok(Some(Todo {
            id,
            text,
            is_completed,
            created_at: existing.created_at,
        }))
    }

    /// Remove the todo with `id`, returning the removed record.
    pub fn delete_todo(&self, id: Uuid) -> Result<Option<Todo>, DbError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let Some(existing) = fetch_todo(&conn, id)? else {
            return Ok(None);
        };

        conn.execute("DELETE FROM todos WHERE id = ?", [id.to_string()])?;
        Ok(Some(existing))
    }
}

/// Trim `text` and reject it if nothing is left.
pub fn validate_text(text: &str) -> Result<String, DbError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DbError::Validation(BLANK_TEXT_MESSAGE.to_string()));
    }
    Ok(trimmed.to_string())
}

fn fetch_todo(conn: &Connection, id: Uuid) -> Result<Option<Todo>, DbError> {
    let mut stmt = conn.prepare(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?"))?;

    let mut rows = stmt.query([id.to_string()])?;
    let todo = match rows.next()? {
        Some(row) => Some(row_to_todo(row)?),
        None => None,
    };
    Ok(todo)
}

fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: parse_uuid(0, row.get::<_, String>(0)?)?,
        text: row.get(1)?,
        is_completed: row.get::<_, i32>(2)? != 0,
        created_at: parse_datetime(3, row.get::<_, String>(3)?)?,
    })
}

// Fixed-width UTC timestamps sort lexicographically in creation order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_uuid(idx: usize, s: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_datetime(idx: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_text_trims_surrounding_whitespace() {
        assert_eq!(validate_text("  walk dog \n").unwrap(), "walk dog");
    }

    #[test]
    fn validate_text_rejects_whitespace_only() {
        let err = validate_text(" \t ").unwrap_err();
        assert!(matches!(err, DbError::Validation(ref msg) if msg == BLANK_TEXT_MESSAGE));
    }

    #[test]
    fn formatted_timestamps_round_trip() {
        let now = Utc::now();
        let parsed = parse_datetime(0, format_datetime(&now)).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn open_url_accepts_memory_aliases() {
        for url in [":memory:", "sqlite::memory:"] {
            let db = Database::open_url(url).unwrap();
            db.migrate().unwrap();
            assert!(db.list_todos().unwrap().is_empty());
        }
    }

    #[test]
    fn open_url_rejects_empty_string() {
        assert!(Database::open_url("  ").is_err());
    }

    #[test]
    fn list_fails_before_migration() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(db.list_todos(), Err(DbError::Sqlite(_))));
    }
}
