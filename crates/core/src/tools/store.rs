//! Persistence seam for tool records.
//!
//! [`ToolStore`] is the only thing the query/mutation service knows about the
//! database. The PostgreSQL implementation lives in `toolkit-db`; the
//! in-memory one in [`super::memory`].

use async_trait::async_trait;

use super::{NewTool, Tool, ToolFilter, ToolPatch};
use crate::types::DbId;

/// Offset/limit slice of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: i64,
    pub limit: i64,
}

/// Store failures, classified from the driver's structured error data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store error: {0}")]
    Other(String),
}

#[async_trait]
pub trait ToolStore: Send + Sync {
    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;

    /// One ordered page of matching rows plus the total match count, both
    /// read from the same snapshot.
    ///
    /// Ordering is `created_at DESC, id DESC`.
    async fn list(
        &self,
        filter: &ToolFilter,
        window: PageWindow,
    ) -> Result<(Vec<Tool>, i64), StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Tool>, StoreError>;

    /// Insert a row, stamping `id`, `created_at` and `updated_at`.
    async fn insert(&self, input: &NewTool) -> Result<Tool, StoreError>;

    /// Apply `patch` and re-stamp `updated_at` in the same write.
    ///
    /// Returns `None` if no row with the given `id` exists.
    async fn update(&self, id: DbId, patch: &ToolPatch) -> Result<Option<Tool>, StoreError>;

    /// Returns `true` when exactly one row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;

    /// Count rows matching `filter`.
    async fn count(&self, filter: &ToolFilter) -> Result<i64, StoreError>;

    /// Count distinct categories in use.
    async fn count_categories(&self) -> Result<i64, StoreError>;
}
