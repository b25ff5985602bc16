//! Text rendering of the client state.

use super::state::{AppState, NotificationKind};

pub const TITLE: &str = "Todo List";
pub const LOADING_MESSAGE: &str = "Data is loading...";
pub const EMPTY_MESSAGE: &str = "No todos found. Add your first task!";

/// Render the whole screen. Tasks are numbered from 1 in list order; the
/// numbers are what the shell commands refer to.
///
/// Example output:
/// ```text
/// Todo List
/// =========
///   1. [ ] Buy milk
///   2. [edit] Walk the cat_
///   3. [x] Pay rent
///
/// (ok) Task completed
/// ```
pub fn render(state: &AppState) -> String {
    let mut output = String::new();
    output.push_str(TITLE);
    output.push('\n');
    output.push_str(&"=".repeat(TITLE.len()));
    output.push('\n');

    if state.is_loading() {
        output.push_str(LOADING_MESSAGE);
        output.push('\n');
    } else if state.todos().is_empty() {
        output.push_str(EMPTY_MESSAGE);
        output.push('\n');
    }

    let editing = state.editing();
    for (i, todo) in state.todos().iter().enumerate() {
        let line = match editing {
            Some(edit) if edit.id == todo.id => format!("{:>3}. [edit] {}_\n", i + 1, edit.text),
            _ => {
                let mark = if todo.is_completed { 'x' } else { ' ' };
                format!("{:>3}. [{}] {}\n", i + 1, mark, todo.text)
            }
        };
        output.push_str(&line);
    }

    if !state.draft().is_empty() {
        output.push_str(&format!("\nNew: {}\n", state.draft()));
    }

    if let Some(notification) = state.notification() {
        let tag = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        output.push_str(&format!("\n({}) {}\n", tag, notification.message));
    }

    output
}
