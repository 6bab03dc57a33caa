//! Work type endpoint tests over in-memory persistence

use axum::http::StatusCode;
use serde_json::json;

use flightnode_server::models::WorkType;

mod helpers;
use helpers::{get, post, put, seeded_app, test_app, Caller, Seed};

fn seeded() -> axum::Router {
    seeded_app(Seed {
        work_types: vec![
            WorkType {
                id: 1,
                description: "Survey".to_string(),
            },
            WorkType {
                id: 2,
                description: "Data entry".to_string(),
            },
        ],
        ..Default::default()
    })
}

#[tokio::test]
async fn test_list_requires_caller() {
    let app = seeded();

    let response = get(&app, "/api/v1/worktypes", Caller::Anonymous).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_list_returns_all_work_types() {
    let app = seeded();

    let response = get(&app, "/api/v1/worktypes", Caller::Volunteer(7)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["data"][1]["description"], "Data entry");
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let app = seeded();

    let response = get(&app, "/api/v1/worktypes/99", Caller::Volunteer(7)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_non_numeric_id_is_enveloped_bad_request() {
    let app = seeded();

    let response = get(&app, "/api/v1/worktypes/survey", Caller::Volunteer(7)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_create_then_read_back() {
    let app = test_app();

    let created = post(
        &app,
        "/api/v1/worktypes",
        Caller::Admin,
        json!({ "description": "Banding" }),
    )
    .await;

    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["data"]["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created.location.as_deref(), Some(format!("/api/v1/worktypes/{}", id).as_str()));

    let fetched = get(&app, &format!("/api/v1/worktypes/{}", id), Caller::Admin).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["description"], "Banding");
}

#[tokio::test]
async fn test_create_rejects_long_description() {
    let app = test_app();

    let response = post(
        &app,
        "/api/v1/worktypes",
        Caller::Admin,
        json!({ "description": "x".repeat(101) }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
    assert!(response.body["error"]["details"]["description"].is_array());
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = test_app();

    let response = helpers::send(
        &app,
        "POST",
        "/api/v1/worktypes",
        Caller::Admin,
        Some(json!(["not", "an", "object"])),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_uses_path_id() {
    let app = seeded();

    let response = put(
        &app,
        "/api/v1/worktypes/2",
        Caller::Admin,
        json!({ "id": 1, "description": "Data entry and QA" }),
    )
    .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let first = get(&app, "/api/v1/worktypes/1", Caller::Admin).await;
    let second = get(&app, "/api/v1/worktypes/2", Caller::Admin).await;
    assert_eq!(first.body["data"]["description"], "Survey");
    assert_eq!(second.body["data"]["description"], "Data entry and QA");
}

#[tokio::test]
async fn test_update_missing_is_user_error() {
    let app = seeded();

    let response = put(
        &app,
        "/api/v1/worktypes/42",
        Caller::Admin,
        json!({ "description": "Nothing" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "USER_ERROR");
}

#[tokio::test]
async fn test_health_without_database() {
    let app = test_app();

    let response = get(&app, "/health", Caller::Anonymous).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"], "none");
}
