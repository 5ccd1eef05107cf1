//! Handlers for the tool directory.
//!
//! Thin adapters over [`ToolService`](toolkit_core::tools::service::ToolService):
//! they parse path/query/body input, translate enum strings at the edge and
//! wrap results in the standard response envelopes.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use toolkit_core::error::CoreError;
use toolkit_core::tools::validation::{CreateTool, UpdateTool};
use toolkit_core::tools::{
    BulkResult, ListToolsParams, StatusFilter, ToolCategory, ToolStatus, DEFAULT_PAGE_LIMIT,
};
use toolkit_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// `status=all` lifts the default active-only filter.
const STATUS_ALL: &str = "all";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query string for `GET /api/v1/tools`.
///
/// Every field arrives as a string and is parsed in [`into_params`](Self::into_params)
/// so malformed values surface as `INVALID_PARAMETER` errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub featured: Option<String>,
    pub search: Option<String>,
    pub created_by: Option<String>,
}

impl ListToolsQuery {
    /// Resolve defaults and parse typed values. Blank strings count as absent;
    /// `featured` is ignored unless it is exactly `true` or `false`.
    pub fn into_params(self) -> Result<ListToolsParams, CoreError> {
        let page = parse_param("page", self.page)?.unwrap_or(1);
        let limit = parse_param("limit", self.limit)?.unwrap_or(DEFAULT_PAGE_LIMIT);

        let category = match non_blank(self.category) {
            Some(raw) => Some(
                raw.parse::<ToolCategory>()
                    .map_err(|e| CoreError::InvalidParameter(e.to_string()))?,
            ),
            None => None,
        };

        let status = match non_blank(self.status) {
            Some(raw) if raw.eq_ignore_ascii_case(STATUS_ALL) => StatusFilter::Any,
            Some(raw) => StatusFilter::Is(
                raw.parse::<ToolStatus>()
                    .map_err(|e| CoreError::InvalidParameter(e.to_string()))?,
            ),
            None => StatusFilter::default(),
        };

        let featured = match non_blank(self.featured).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        Ok(ListToolsParams {
            page,
            limit,
            category,
            status,
            featured,
            search: self.search,
            created_by: parse_param("createdBy", self.created_by)?,
        })
    }
}

/// Body of `POST /api/v1/tools/bulk-delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// Body of `POST /api/v1/tools/bulk-status`.
#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<String>,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/v1/tools
///
/// Paginated, filtered listing, newest first. Active tools only unless
/// `status` is given (`status=all` lists every status).
pub async fn list_tools(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListToolsQuery>,
) -> AppResult<impl IntoResponse> {
    let params = query.into_params()?;
    let page = state.tools.list_tools(&params).await?;

    Ok(Json(PaginatedResponse::from(page)))
}

/// GET /api/v1/tools/stats
pub async fn get_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = state.tools.get_stats().await?;

    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/v1/tools/{id}
pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tool = state.tools.get_tool(parse_tool_id(&id)?).await?;

    Ok(Json(DataResponse::new(tool)))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/tools
pub async fn create_tool(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateTool>,
) -> AppResult<impl IntoResponse> {
    let tool = state.tools.create_tool(&input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(tool))))
}

/// PUT /api/v1/tools/{id}
///
/// Partial update: only fields present in the body are validated and written.
pub async fn update_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateTool>,
) -> AppResult<impl IntoResponse> {
    let tool = state.tools.update_tool(parse_tool_id(&id)?, &input).await?;

    Ok(Json(DataResponse::new(tool)))
}

/// DELETE /api/v1/tools/{id}
pub async fn delete_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.tools.delete_tool(parse_tool_id(&id)?).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tools/bulk-delete
///
/// Always 200; per-id failures are reported in the result body.
pub async fn bulk_delete(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BulkDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    let (ids, malformed) = partition_ids(input.ids);
    let mut result = state.tools.bulk_delete(&ids).await;
    merge_malformed(&mut result, malformed);

    Ok(Json(DataResponse::new(result)))
}

/// POST /api/v1/tools/bulk-status
///
/// An unknown target status rejects the whole request; per-id failures are
/// reported in the result body.
pub async fn bulk_update_status(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BulkStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = input
        .status
        .trim()
        .parse::<ToolStatus>()
        .map_err(|e| CoreError::InvalidParameter(e.to_string()))?;

    let (ids, malformed) = partition_ids(input.ids);
    let mut result = state.tools.bulk_update_status(&ids, status).await;
    merge_malformed(&mut result, malformed);

    Ok(Json(DataResponse::new(result)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an optional query value, naming the parameter on failure.
fn parse_param<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, CoreError> {
    match non_blank(value) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            CoreError::InvalidParameter(format!("Invalid {name} value: {raw}"))
        }),
        None => Ok(None),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A path id that is not a UUID cannot name an existing tool.
fn parse_tool_id(raw: &str) -> Result<DbId, CoreError> {
    raw.parse::<DbId>().map_err(|_| CoreError::NotFound {
        entity: "Tool",
        id: raw.to_string(),
    })
}

/// Split raw ids into parseable UUIDs and the strings that are not.
fn partition_ids(raw: Vec<String>) -> (Vec<DbId>, Vec<String>) {
    let mut ids = Vec::with_capacity(raw.len());
    let mut malformed = Vec::new();
    for id in raw {
        match id.trim().parse::<DbId>() {
            Ok(parsed) => ids.push(parsed),
            Err(_) => malformed.push(id),
        }
    }
    (ids, malformed)
}

fn merge_malformed(result: &mut BulkResult, malformed: Vec<String>) {
    if !malformed.is_empty() {
        tracing::warn!(count = malformed.len(), "Bulk request contained malformed ids");
    }
    for id in malformed {
        result.record_failure(id);
    }
}
