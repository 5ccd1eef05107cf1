//! Domain layer for the toolkit directory.
//!
//! Holds the tool entity, its validation rules, the store abstraction and the
//! query/mutation service built on top of it, plus the markdown docs index.
//! Nothing in here talks to PostgreSQL directly; see `toolkit-db` for that.

pub mod docs;
pub mod error;
pub mod tools;
pub mod types;
