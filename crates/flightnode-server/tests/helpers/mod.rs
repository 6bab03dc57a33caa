//! Test helpers for FlightNode server integration tests
//!
//! Builds the full router over in-memory persistence and provides request
//! shortcuts that attach the caller identity headers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use flightnode_server::api::{self, AppState};
use flightnode_server::config::CorsConfig;
use flightnode_server::db::memory::{
    MemoryCrudSet, MemorySurveyPersistence, MemoryUserPersistence,
};
use flightnode_server::features::users::UserManager;
use flightnode_server::features::waterbird_foraging::ForagingSurveyManager;
use flightnode_server::features::work_types::WorkTypeManager;
use flightnode_server::features::FeatureState;
use flightnode_server::middleware::{USER_ID_HEADER, USER_ROLES_HEADER};
use flightnode_server::models::{Location, User, WorkType};

pub const ADMIN_ID: i32 = 1;
pub const VOLUNTEER_ID: i32 = 7;
pub const SITE_ID: i32 = 3;

/// Who the request claims to be
#[derive(Debug, Clone, Copy)]
pub enum Caller {
    Anonymous,
    Admin,
    Volunteer(i32),
}

/// Seed data for a test app
#[derive(Default)]
pub struct Seed {
    pub work_types: Vec<WorkType>,
    pub users: Vec<User>,
}

pub fn bolivar_flats() -> Location {
    Location {
        id: SITE_ID,
        site_name: "Bolivar Flats".to_string(),
        site_code: Some("BF".to_string()),
        latitude: Some(29.38),
        longitude: Some(-94.73),
    }
}

pub fn test_app() -> Router {
    seeded_app(Seed::default())
}

pub fn seeded_app(seed: Seed) -> Router {
    let locations = vec![bolivar_flats()];

    let features = FeatureState {
        work_types: Arc::new(WorkTypeManager::new(Arc::new(MemoryCrudSet::with_rows(
            seed.work_types,
        )))),
        surveys: Arc::new(ForagingSurveyManager::new(
            Arc::new(MemorySurveyPersistence::with_locations(locations.clone())),
            Arc::new(MemoryCrudSet::with_rows(locations)),
        )),
        users: Arc::new(UserManager::new(Arc::new(MemoryUserPersistence::with_users(
            seed.users,
        )))),
    };

    let cors = CorsConfig {
        allowed_origins: vec!["http://localhost:9000".to_string()],
        allow_credentials: true,
    };

    api::create_router(AppState::new(features), &cors)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Caller,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);

    builder = match caller {
        Caller::Anonymous => builder,
        Caller::Admin => builder
            .header(USER_ID_HEADER, ADMIN_ID.to_string())
            .header(USER_ROLES_HEADER, "Administrator"),
        Caller::Volunteer(id) => builder
            .header(USER_ID_HEADER, id.to_string())
            .header(USER_ROLES_HEADER, "Volunteer"),
    };

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        location,
        body,
    }
}

pub async fn get(app: &Router, uri: &str, caller: Caller) -> TestResponse {
    send(app, "GET", uri, caller, None).await
}

pub async fn post(app: &Router, uri: &str, caller: Caller, body: Value) -> TestResponse {
    send(app, "POST", uri, caller, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, caller: Caller, body: Value) -> TestResponse {
    send(app, "PUT", uri, caller, Some(body)).await
}
