//! Query and mutation operations over a [`ToolStore`].
//!
//! The service owns parameter checks, input validation and the translation of
//! store failures into [`CoreError`]. It holds no state of its own beyond the
//! injected store handle, so every call reflects the latest committed data.

use std::sync::Arc;

use futures::future::join_all;

use super::store::{PageWindow, StoreError, ToolStore};
use super::validation::{validate_create, validate_patch, CreateTool, UpdateTool};
use super::{
    BulkResult, ListToolsParams, StatusFilter, Tool, ToolFilter, ToolPage, ToolPatch, ToolStats,
    ToolStatus, MAX_PAGE_LIMIT,
};
use crate::error::CoreError;
use crate::types::DbId;

/// Cheaply cloneable handle to the tool query/mutation layer.
#[derive(Clone)]
pub struct ToolService {
    store: Arc<dyn ToolStore>,
}

impl ToolService {
    pub fn new(store: Arc<dyn ToolStore>) -> Self {
        Self { store }
    }

    /// Verify the store is reachable.
    pub async fn ping(&self) -> Result<(), CoreError> {
        self.store
            .ping()
            .await
            .map_err(|e| store_failure("ping store", e))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// List one page of tools matching `params`, newest first.
    ///
    /// Status defaults to active-only. Fails with `InvalidParameter` when
    /// `page < 1` or `limit` is outside `1..=100`.
    pub async fn list_tools(&self, params: &ListToolsParams) -> Result<ToolPage, CoreError> {
        let window = page_window(params.page, params.limit)?;

        let filter = ToolFilter {
            category: params.category,
            status: match params.status {
                StatusFilter::Is(status) => Some(status),
                StatusFilter::Any => None,
            },
            featured: params.featured,
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            created_by: params.created_by,
        };

        let (items, total) = self
            .store
            .list(&filter, window)
            .await
            .map_err(|e| store_failure("list tools", e))?;

        tracing::debug!(
            page = params.page,
            limit = params.limit,
            returned = items.len(),
            total,
            "Listed tools"
        );

        Ok(ToolPage {
            items,
            total,
            page: params.page,
            limit: params.limit,
        })
    }

    /// Fetch a single tool by id.
    pub async fn get_tool(&self, id: DbId) -> Result<Tool, CoreError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("fetch tool", e))?
            .ok_or_else(|| CoreError::tool_not_found(id))
    }

    /// Aggregate counts by status, featured flag and distinct categories.
    ///
    /// The six aggregates run concurrently; if any one fails the whole call
    /// fails and no partial stats are returned.
    pub async fn get_stats(&self) -> Result<ToolStats, CoreError> {
        let all = ToolFilter::default();
        let active = ToolFilter::with_status(ToolStatus::Active);
        let pending = ToolFilter::with_status(ToolStatus::Pending);
        let inactive = ToolFilter::with_status(ToolStatus::Inactive);
        let featured = ToolFilter {
            featured: Some(true),
            ..Default::default()
        };

        let (total, active, pending, inactive, featured, categories) = tokio::try_join!(
            self.store.count(&all),
            self.store.count(&active),
            self.store.count(&pending),
            self.store.count(&inactive),
            self.store.count(&featured),
            self.store.count_categories(),
        )
        .map_err(|e| store_failure("compute tool stats", e))?;

        Ok(ToolStats {
            total,
            active,
            pending,
            inactive,
            featured,
            categories,
        })
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Validate and insert a new tool.
    pub async fn create_tool(&self, input: &CreateTool) -> Result<Tool, CoreError> {
        let new_tool = validate_create(input).map_err(CoreError::Validation)?;

        let tool = self
            .store
            .insert(&new_tool)
            .await
            .map_err(|e| store_failure("create tool", e))?;

        tracing::info!(tool_id = %tool.id, category = %tool.category, "Tool created");
        Ok(tool)
    }

    /// Validate the present fields of `input` and apply them to tool `id`.
    pub async fn update_tool(&self, id: DbId, input: &UpdateTool) -> Result<Tool, CoreError> {
        let patch = validate_patch(input).map_err(CoreError::Validation)?;
        self.apply_patch(id, &patch).await
    }

    /// Delete tool `id`. Fails with `NotFound` when nothing was removed.
    pub async fn delete_tool(&self, id: DbId) -> Result<(), CoreError> {
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| store_failure("delete tool", e))?;

        if !deleted {
            return Err(CoreError::tool_not_found(id));
        }

        tracing::info!(tool_id = %id, "Tool deleted");
        Ok(())
    }

    /// Delete each id independently. One failure never stops the others.
    pub async fn bulk_delete(&self, ids: &[DbId]) -> BulkResult {
        let outcomes = join_all(ids.iter().map(|&id| async move {
            (id, self.delete_tool(id).await)
        }))
        .await;

        let result = tally(outcomes);
        tracing::info!(
            succeeded = result.succeeded,
            failed = result.failed,
            "Bulk delete finished"
        );
        result
    }

    /// Move each id to `status` independently. One failure never stops the
    /// others.
    pub async fn bulk_update_status(&self, ids: &[DbId], status: ToolStatus) -> BulkResult {
        let patch = ToolPatch::status(status);
        let patch = &patch;
        let outcomes = join_all(ids.iter().map(|&id| async move {
            (id, self.apply_patch(id, patch).await.map(|_| ()))
        }))
        .await;

        let result = tally(outcomes);
        tracing::info!(
            %status,
            succeeded = result.succeeded,
            failed = result.failed,
            "Bulk status update finished"
        );
        result
    }

    async fn apply_patch(&self, id: DbId, patch: &ToolPatch) -> Result<Tool, CoreError> {
        let tool = self
            .store
            .update(id, patch)
            .await
            .map_err(|e| store_failure("update tool", e))?
            .ok_or_else(|| CoreError::tool_not_found(id))?;

        tracing::info!(tool_id = %id, "Tool updated");
        Ok(tool)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Check pagination inputs and convert them to an offset/limit window.
fn page_window(page: i64, limit: i64) -> Result<PageWindow, CoreError> {
    if page < 1 {
        return Err(CoreError::InvalidParameter(format!(
            "page must be at least 1, got {page}"
        )));
    }
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(CoreError::InvalidParameter(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
        )));
    }
    let offset = (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| CoreError::InvalidParameter(format!("page {page} is out of range")))?;
    Ok(PageWindow { offset, limit })
}

fn tally(outcomes: Vec<(DbId, Result<(), CoreError>)>) -> BulkResult {
    let mut result = BulkResult::default();
    for (id, outcome) in outcomes {
        match outcome {
            Ok(()) => result.succeeded += 1,
            Err(err) => {
                tracing::warn!(tool_id = %id, error = %err, "Bulk item failed");
                result.record_failure(id.to_string());
            }
        }
    }
    result
}

/// Log the underlying store failure and map it to a caller-safe error.
fn store_failure(operation: &'static str, err: StoreError) -> CoreError {
    match err {
        StoreError::UniqueViolation { constraint } => {
            tracing::warn!(operation, %constraint, "Unique constraint violated");
            if constraint == "uq_tools_url" {
                CoreError::DuplicateKey("Tool with this URL already exists".into())
            } else {
                CoreError::DuplicateKey("Duplicate value violates a unique constraint".into())
            }
        }
        StoreError::ForeignKeyViolation { constraint } => {
            tracing::warn!(operation, %constraint, "Foreign key violated");
            CoreError::ForeignKeyViolation("Invalid user reference".into())
        }
        StoreError::Unavailable(cause) => {
            tracing::error!(operation, error = %cause, "Tool store unavailable");
            CoreError::StorageUnavailable(format!("Failed to {operation}: store unavailable"))
        }
        StoreError::Other(cause) => {
            tracing::error!(operation, error = %cause, "Tool store error");
            CoreError::Internal(format!("Failed to {operation}"))
        }
    }
}
