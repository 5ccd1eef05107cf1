pub mod docs;
pub mod health;
pub mod tools;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tools                                list, create
/// /tools/stats                          aggregate counts
/// /tools/bulk-delete                    delete many (POST)
/// /tools/bulk-status                    set status on many (POST)
/// /tools/{id}                           get, update (PUT), delete
///
/// /docs                                 markdown documentation index
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tools", tools::router())
        .nest("/docs", docs::router())
}
