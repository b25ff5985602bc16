//! Personal task list: a JSON API over a SQLite-backed todo store, and a
//! terminal client that drives it.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod models;
