#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use toolkit_api::config::ServerConfig;
use toolkit_api::router::build_app_router;
use toolkit_api::state::AppState;
use toolkit_core::tools::memory::MemoryToolStore;
use toolkit_core::tools::service::ToolService;
use toolkit_db::PgToolStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        docs_dir: PathBuf::from("docs"),
        database_max_connections: 5,
    }
}

/// Build the full application router over the given service and config.
///
/// Uses the production [`build_app_router`] so tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery).
pub fn build_app(tools: ToolService, config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        tools,
    };
    build_app_router(state, &config)
}

/// Router over a fresh in-memory store. The store handle is returned so tests
/// can seed users or simulate an outage.
pub fn build_test_app() -> (Router, Arc<MemoryToolStore>) {
    let store = Arc::new(MemoryToolStore::new());
    let tools = ToolService::new(store.clone());
    (build_app(tools, test_config()), store)
}

/// Router over PostgreSQL.
pub fn build_pg_test_app(pool: PgPool) -> Router {
    let tools = ToolService::new(Arc::new(PgToolStore::new(pool)));
    build_app(tools, test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid create payload with a unique url derived from `title`.
pub fn tool_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": format!("{title} description"),
        "url": format!("https://{}.example.com", title.to_lowercase().replace(' ', "-")),
        "category": "developer-tools",
    })
}
