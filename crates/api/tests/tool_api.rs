//! HTTP-level tests for the tool endpoints over the in-memory store.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json, tool_payload};
use serde_json::json;
use toolkit_core::types::DbId;

async fn create(app: axum::Router, title: &str) -> serde_json::Value {
    let response = post_json(app, "/api/v1/tools", tool_payload(title)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_tool_returns_201_with_defaults() {
    let (app, _store) = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/tools",
        json!({
            "title": "VS Code",
            "description": "Code editor",
            "url": "https://code.visualstudio.com",
            "category": "developer-tools",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["title"], "VS Code");
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["featured"], false);
    assert_eq!(json["data"]["createdAt"], json["data"]["updatedAt"]);
    assert!(json["data"]["id"].is_string());
}

#[tokio::test]
async fn test_create_invalid_url_returns_validation_details() {
    let (app, store) = common::build_test_app();
    let mut payload = tool_payload("Broken");
    payload["url"] = json!("not-a-url");

    let response = post_json(app, "/api/v1/tools", payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["details"][0]["field"], "url");
    assert!(json["details"][0]["message"]
        .as_str()
        .unwrap()
        .contains("URL"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_create_missing_fields_reports_each() {
    let (app, _store) = common::build_test_app();
    let response = post_json(app, "/api/v1/tools", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "description", "url", "category"]);
}

#[tokio::test]
async fn test_create_duplicate_url_returns_409() {
    let (app, _store) = common::build_test_app();
    create(app.clone(), "Figma").await;

    let response = post_json(app, "/api/v1/tools", tool_payload("Figma")).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_KEY");
}

#[tokio::test]
async fn test_create_unknown_creator_returns_400() {
    let (app, store) = common::build_test_app();
    let user = DbId::new_v4();
    store.add_user(user).await;

    let mut ok = tool_payload("Known");
    ok["createdBy"] = json!(user);
    let response = post_json(app.clone(), "/api/v1/tools", ok).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut bad = tool_payload("Unknown");
    bad["createdBy"] = json!(DbId::new_v4());
    let response = post_json(app, "/api/v1/tools", bad).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "FOREIGN_KEY_VIOLATION");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_get_tool_round_trips() {
    let (app, _store) = common::build_test_app();
    let created = create(app.clone(), "Postman").await;
    let id = created["id"].as_str().unwrap();

    let response = get(app, &format!("/api/v1/tools/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], created);
}

#[tokio::test]
async fn test_get_unknown_or_malformed_id_returns_404() {
    let (app, _store) = common::build_test_app();

    let response = get(app.clone(), &format!("/api/v1/tools/{}", DbId::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/v1/tools/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_paginates_with_metadata() {
    let (app, _store) = common::build_test_app();
    for i in 0..3 {
        create(app.clone(), &format!("Tool {i}")).await;
    }

    let response = get(app, "/api/v1/tools?page=2&limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "Tool 0");
    assert_eq!(
        json["pagination"],
        json!({"page": 2, "limit": 2, "total": 3, "totalPages": 2})
    );
}

#[tokio::test]
async fn test_list_status_filters() {
    let (app, _store) = common::build_test_app();
    create(app.clone(), "Live").await;
    let mut pending = tool_payload("Queued");
    pending["status"] = json!("pending");
    post_json(app.clone(), "/api/v1/tools", pending).await;

    let json = body_json(get(app.clone(), "/api/v1/tools").await).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["title"], "Live");

    let json = body_json(get(app.clone(), "/api/v1/tools?status=pending").await).await;
    assert_eq!(json["data"][0]["title"], "Queued");

    let json = body_json(get(app, "/api/v1/tools?status=all").await).await;
    assert_eq!(json["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_list_search_and_featured() {
    let (app, _store) = common::build_test_app();
    let mut figma = tool_payload("Figma");
    figma["featured"] = json!(true);
    post_json(app.clone(), "/api/v1/tools", figma).await;
    create(app.clone(), "Sketch").await;

    let json = body_json(get(app.clone(), "/api/v1/tools?search=FIG").await).await;
    assert_eq!(json["pagination"]["total"], 1);

    let json = body_json(get(app, "/api/v1/tools?featured=false").await).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["title"], "Sketch");
}

#[tokio::test]
async fn test_list_rejects_bad_parameters() {
    let (app, _store) = common::build_test_app();

    for uri in [
        "/api/v1/tools?page=0",
        "/api/v1/tools?limit=101",
        "/api/v1/tools?category=spaceships",
        "/api/v1/tools?status=archived",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "INVALID_PARAMETER", "{uri}");
    }
}

#[tokio::test]
async fn test_stats_counts() {
    let (app, _store) = common::build_test_app();

    let json = body_json(get(app.clone(), "/api/v1/tools/stats").await).await;
    assert_eq!(
        json["data"],
        json!({"total": 0, "active": 0, "pending": 0, "inactive": 0, "featured": 0, "categories": 0})
    );

    let mut design = tool_payload("Figma");
    design["category"] = json!("design-tools");
    design["featured"] = json!(true);
    post_json(app.clone(), "/api/v1/tools", design).await;
    create(app.clone(), "Postman").await;

    let json = body_json(get(app, "/api/v1/tools/stats").await).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["active"], 2);
    assert_eq!(json["data"]["featured"], 1);
    assert_eq!(json["data"]["categories"], 2);
}

#[tokio::test]
async fn test_store_outage_returns_sanitized_500() {
    let (app, store) = common::build_test_app();
    store.set_unavailable(true).await;

    let response = get(app, "/api/v1/tools").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "STORAGE_UNAVAILABLE");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let (app, _store) = common::build_test_app();
    let created = create(app.clone(), "Notion").await;
    let id = created["id"].as_str().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/tools/{id}"),
        json!({"title": "Notion Calendar"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Notion Calendar");
    assert_eq!(updated["url"], created["url"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn test_update_empty_body_is_validation_error() {
    let (app, _store) = common::build_test_app();
    let created = create(app.clone(), "Linear").await;
    let id = created["id"].as_str().unwrap();

    let response = put_json(app, &format!("/api/v1/tools/{id}"), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_missing_tool_returns_404() {
    let (app, _store) = common::build_test_app();
    let response = put_json(
        app,
        &format!("/api/v1/tools/{}", DbId::new_v4()),
        json!({"title": "Ghost"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_twice_returns_404() {
    let (app, _store) = common::build_test_app();
    let created = create(app.clone(), "Slack").await;
    let uri = format!("/api/v1/tools/{}", created["id"].as_str().unwrap());

    assert_eq!(delete(app.clone(), &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_bulk_delete_counts_missing_and_malformed() {
    let (app, store) = common::build_test_app();
    let created = create(app.clone(), "Zoom").await;
    let missing = DbId::new_v4().to_string();

    let response = post_json(
        app,
        "/api/v1/tools/bulk-delete",
        json!({"ids": [created["id"], missing, "garbage"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["succeeded"], 1);
    assert_eq!(json["data"]["failed"], 2);
    let failed_ids = json["data"]["failedIds"].as_array().unwrap();
    assert!(failed_ids.contains(&json!(missing)));
    assert!(failed_ids.contains(&json!("garbage")));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_bulk_status_moves_tools() {
    let (app, _store) = common::build_test_app();
    let a = create(app.clone(), "Alpha").await;
    let b = create(app.clone(), "Beta").await;

    let response = post_json(
        app.clone(),
        "/api/v1/tools/bulk-status",
        json!({"ids": [a["id"], b["id"]], "status": "inactive"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"], json!({"succeeded": 2, "failed": 0, "failedIds": []}));

    let json = body_json(get(app, "/api/v1/tools?status=inactive").await).await;
    assert_eq!(json["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_bulk_status_rejects_unknown_status() {
    let (app, _store) = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/tools/bulk-status",
        json!({"ids": [], "status": "archived"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PARAMETER");
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_wrongly_typed_body_field_returns_400_envelope() {
    let (app, store) = common::build_test_app();
    let mut payload = tool_payload("Typed");
    payload["title"] = json!(5);

    let response = post_json(app, "/api/v1/tools", payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("title"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_malformed_bulk_body_returns_400_envelope() {
    let (app, _store) = common::build_test_app();
    let response = post_json(app, "/api/v1/tools/bulk-delete", json!({"ids": "abc"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_malformed_query_values_return_invalid_parameter() {
    let (app, _store) = common::build_test_app();

    for uri in [
        "/api/v1/tools?page=abc",
        "/api/v1/tools?limit=ten",
        "/api/v1/tools?createdBy=x",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["success"], false, "{uri}");
        assert_eq!(json["code"], "INVALID_PARAMETER", "{uri}");
    }
}

#[tokio::test]
async fn test_unrecognized_featured_value_is_ignored() {
    let (app, _store) = common::build_test_app();
    let mut figma = tool_payload("Figma");
    figma["featured"] = json!(true);
    post_json(app.clone(), "/api/v1/tools", figma).await;
    create(app.clone(), "Sketch").await;

    for uri in ["/api/v1/tools?featured=yes", "/api/v1/tools?featured="] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await["pagination"]["total"], 2, "{uri}");
    }
}
