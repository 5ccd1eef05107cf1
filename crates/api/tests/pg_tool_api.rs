//! HTTP-level tests for the tool endpoints backed by PostgreSQL.
//!
//! Each test gets a fresh database with migrations applied by `sqlx::test`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json, tool_payload};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_get(pool: PgPool) {
    let app = common::build_pg_test_app(pool);
    let response = post_json(app.clone(), "/api/v1/tools", tool_payload("Docker")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    assert_eq!(created["status"], "active");

    let id = created["id"].as_str().unwrap();
    let response = get(app, &format!("/api/v1/tools/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "Docker");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_url_returns_409(pool: PgPool) {
    let app = common::build_pg_test_app(pool);
    post_json(app.clone(), "/api/v1/tools", tool_payload("GitHub")).await;

    let response = post_json(app, "/api/v1/tools", tool_payload("GitHub")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_KEY");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_creator_returns_400(pool: PgPool) {
    let app = common::build_pg_test_app(pool);
    let mut payload = tool_payload("Orphan");
    payload["createdBy"] = json!(uuid::Uuid::new_v4());

    let response = post_json(app, "/api/v1/tools", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "FOREIGN_KEY_VIOLATION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_clear_image(pool: PgPool) {
    let app = common::build_pg_test_app(pool);
    let mut payload = tool_payload("Canva");
    payload["image"] = json!("https://img.example.com/canva.png");
    let created = body_json(post_json(app.clone(), "/api/v1/tools", payload).await).await["data"].clone();
    let uri = format!("/api/v1/tools/{}", created["id"].as_str().unwrap());

    let response = put_json(app, &uri, json!({"image": ""})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert!(updated["image"].is_null());
    assert_eq!(updated["title"], "Canva");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_and_delete(pool: PgPool) {
    let app = common::build_pg_test_app(pool);
    for title in ["One", "Two", "Three"] {
        post_json(app.clone(), "/api/v1/tools", tool_payload(title)).await;
    }

    let json = body_json(get(app.clone(), "/api/v1/tools?limit=2").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"][0]["title"], "Three");
    assert_eq!(json["pagination"]["totalPages"], 2);

    let id = json["data"][0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/tools/{id}");
    assert_eq!(delete(app.clone(), &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_delete_partial(pool: PgPool) {
    let app = common::build_pg_test_app(pool);
    let created = body_json(post_json(app.clone(), "/api/v1/tools", tool_payload("Miro")).await).await["data"].clone();

    let response = post_json(
        app,
        "/api/v1/tools/bulk-delete",
        json!({"ids": [created["id"], uuid::Uuid::new_v4()]}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["succeeded"], 1);
    assert_eq!(json["data"]["failed"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_empty(pool: PgPool) {
    let app = common::build_pg_test_app(pool);
    let json = body_json(get(app, "/api/v1/tools/stats").await).await;
    assert_eq!(json["data"]["total"], 0);
    assert_eq!(json["data"]["categories"], 0);
}
