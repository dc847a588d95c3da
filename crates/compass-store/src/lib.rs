//! Compass store crate - durable SQLite session persistence.
//!
//! Provides a WAL-mode SQLite database with migrations and a session
//! repository whose `apply_turn` is the only conversational mutator,
//! serialized per session id. Sessions rehydrate identically after a
//! process restart.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::SessionRepository;
