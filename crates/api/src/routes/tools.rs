//! Route definitions for the tool directory, mounted at `/tools`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tools;
use crate::state::AppState;

/// ```text
/// GET    /                -> list_tools
/// POST   /                -> create_tool
/// GET    /stats           -> get_stats
/// POST   /bulk-delete     -> bulk_delete
/// POST   /bulk-status     -> bulk_update_status
/// GET    /{id}            -> get_tool
/// PUT    /{id}            -> update_tool
/// DELETE /{id}            -> delete_tool
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tools::list_tools).post(tools::create_tool))
        .route("/stats", get(tools::get_stats))
        .route("/bulk-delete", post(tools::bulk_delete))
        .route("/bulk-status", post(tools::bulk_update_status))
        .route(
            "/{id}",
            get(tools::get_tool)
                .put(tools::update_tool)
                .delete(tools::delete_tool),
        )
}
