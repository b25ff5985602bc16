use anyhow::{Context, Result};
use rusqlite::Connection;

const INITIAL_SCHEMA: &str = include_str!("migrations/001_initial.sql");

/// Create the todos table and its index if they are missing.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(INITIAL_SCHEMA)
        .context("Failed to create todos schema")?;
    tracing::debug!("Todo schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todos_table_count(conn: &Connection) -> i32 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='todos'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn creates_todos_table_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(todos_table_count(&conn), 1);
    }

    #[test]
    fn rerunning_keeps_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO todos (id, text, is_completed, created_at) VALUES ('a', 'keep', 0, 'now')",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(todos_table_count(&conn), 1);
    }

    #[test]
    fn blank_text_is_rejected_by_table_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO todos (id, text, is_completed, created_at) VALUES ('a', '   ', 0, 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
