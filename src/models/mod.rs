//! Domain models for the task list.
//!
//! There is a single entity, [`Todo`]. It is created through [`CreateTodo`]
//! (validated from a [`CreateTodoInput`] request body) and changed in place
//! through a [`TodoPatch`] (read from an [`UpdateTodoInput`] request body).

mod todo;

pub use todo::*;
