//! Terminal client for the todo API.
//!
//! [`state::AppState`] holds everything the user sees and changes only through
//! its transitions. [`Session`] pairs it with an API handle and the
//! notification timer, [`view`] renders it and [`shell`] reads commands.

pub mod http;
pub mod notify;
pub mod session;
pub mod shell;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use http::{ClientError, TodoApi, TodoClient};
pub use session::{Action, Session};
pub use state::{AppState, EditState, Notification, NotificationKind};
