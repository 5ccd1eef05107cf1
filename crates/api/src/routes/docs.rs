use axum::routing::get;
use axum::Router;

use crate::handlers::docs;
use crate::state::AppState;

/// Docs index mounted at `/docs`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(docs::list_docs))
}
