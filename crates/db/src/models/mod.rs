//! Row types mapped with `sqlx::FromRow`.

pub mod tool;
