//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept a sqlx executor as the first argument.

pub mod tool_repo;

pub use tool_repo::ToolRepo;
