//! Handler for the markdown documentation index.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use toolkit_core::docs::scan_docs;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/docs
///
/// Rescans the configured docs directory on every request.
pub async fn list_docs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let root = state.config.docs_dir.clone();

    let index = tokio::task::spawn_blocking(move || scan_docs(&root))
        .await
        .map_err(|e| AppError::InternalError(format!("Docs scan task failed: {e}")))??;

    tracing::debug!(total_files = index.total_files, "Docs index built");

    Ok(Json(DataResponse::new(index)))
}
