//! Waterbird foraging survey lifecycle tests over in-memory persistence

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

mod helpers;
use helpers::{get, post, put, test_app, Caller, SITE_ID, VOLUNTEER_ID};

const BASE: &str = "/api/v1/waterbirdforagingsurvey";

fn step_one() -> Value {
    json!({
        "locationId": SITE_ID,
        "siteTypeId": 2,
        "accessPointInfoId": 1,
        "startDate": "2016-06-04T07:30:00",
        "temperature": 27,
        "windSpeed": 2,
        "step": 1,
        "observers": [VOLUNTEER_ID, 12]
    })
}

fn with_observations(mut body: Value, step: i32) -> Value {
    body["step"] = json!(step);
    body["observations"] = json!([
        { "birdSpeciesId": 14, "adults": 6, "juveniles": 2, "feedingId": 1, "habitatId": 3 },
        { "birdSpeciesId": 21, "adults": 1, "juveniles": 0 }
    ]);
    body["disturbances"] = json!([
        { "disturbanceTypeId": 4, "quantity": 2, "durationMinutes": 10, "behavior": "flushed" }
    ]);
    body
}

async fn start_survey(app: &axum::Router) -> Uuid {
    let response = post(app, BASE, Caller::Volunteer(VOLUNTEER_ID), step_one()).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let identifier: Uuid = response.body["data"]["surveyIdentifier"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(
        response.location.as_deref(),
        Some(format!("{}/{}", BASE, identifier).as_str())
    );
    identifier
}

#[tokio::test]
async fn test_create_assigns_identifier_and_stays_pending() {
    let app = test_app();
    let identifier = start_survey(&app).await;
    assert!(!identifier.is_nil());

    let fetched = get(&app, &format!("{}/{}", BASE, identifier), Caller::Volunteer(VOLUNTEER_ID)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["step"], 1);
    assert_eq!(fetched.body["data"]["locationId"], SITE_ID);
    assert_eq!(fetched.body["data"]["observers"], json!([VOLUNTEER_ID, 12]));

    let list = get(
        &app,
        &format!("{}?userId={}", BASE, VOLUNTEER_ID),
        Caller::Volunteer(VOLUNTEER_ID),
    )
    .await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["meta"]["count"], 1);
    assert_eq!(list.body["data"][0]["status"], "Pending");
    assert_eq!(list.body["data"][0]["location"], "Bolivar Flats");
    assert_eq!(list.body["data"][0]["startDate"], "6/4/2016");
}

#[tokio::test]
async fn test_create_requires_caller() {
    let app = test_app();

    let response = post(&app, BASE, Caller::Anonymous, step_one()).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_with_unknown_location_is_validation_error() {
    let app = test_app();
    let mut body = step_one();
    body["locationId"] = json!(999);

    let response = post(&app, BASE, Caller::Volunteer(VOLUNTEER_ID), body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
    assert!(response.body["error"]["details"]["location_id"].is_array());
}

#[tokio::test]
async fn test_create_ignores_submitted_step() {
    let app = test_app();

    for step in [4, 15] {
        let mut body = step_one();
        body["step"] = json!(step);
        let created = post(&app, BASE, Caller::Volunteer(VOLUNTEER_ID), body).await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body["data"]["step"], 1);
    }

    let list = get(
        &app,
        &format!("{}?userId={}", BASE, VOLUNTEER_ID),
        Caller::Volunteer(VOLUNTEER_ID),
    )
    .await;
    assert_eq!(list.body["meta"]["count"], 2);
    assert_eq!(list.body["data"][0]["status"], "Pending");
    assert_eq!(list.body["data"][1]["status"], "Pending");
}

#[tokio::test]
async fn test_update_with_bad_step_is_validation_error() {
    let app = test_app();
    let identifier = start_survey(&app).await;
    let mut body = step_one();
    body["step"] = json!(9);

    let response = put(&app, &format!("{}/{}", BASE, identifier), Caller::Volunteer(VOLUNTEER_ID), body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]["details"]["step"].is_array());
}

#[tokio::test]
async fn test_intermediate_step_saves_children() {
    let app = test_app();
    let identifier = start_survey(&app).await;
    let uri = format!("{}/{}", BASE, identifier);

    let response = put(
        &app,
        &uri,
        Caller::Volunteer(VOLUNTEER_ID),
        with_observations(step_one(), 2),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["step"], 2);
    assert_eq!(data["observations"].as_array().unwrap().len(), 2);
    assert_eq!(data["observations"][0]["adults"], 6);
    assert_eq!(data["disturbances"][0]["behavior"], "flushed");

    let list = get(
        &app,
        &format!("{}?userId={}", BASE, VOLUNTEER_ID),
        Caller::Volunteer(VOLUNTEER_ID),
    )
    .await;
    assert_eq!(list.body["data"][0]["status"], "Pending");
}

#[tokio::test]
async fn test_final_step_completes_survey() {
    let app = test_app();
    let identifier = start_survey(&app).await;
    let uri = format!("{}/{}", BASE, identifier);

    let response = put(
        &app,
        &uri,
        Caller::Volunteer(VOLUNTEER_ID),
        with_observations(step_one(), 4),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["step"], 4);
    assert_eq!(response.body["data"]["surveyIdentifier"], identifier.to_string());

    let list = get(
        &app,
        &format!("{}?userId={}", BASE, VOLUNTEER_ID),
        Caller::Volunteer(VOLUNTEER_ID),
    )
    .await;
    assert_eq!(list.body["meta"]["count"], 1);
    assert_eq!(list.body["data"][0]["status"], "Complete");
}

#[tokio::test]
async fn test_completed_survey_edits_in_place() {
    let app = test_app();
    let identifier = start_survey(&app).await;
    let uri = format!("{}/{}", BASE, identifier);

    put(&app, &uri, Caller::Volunteer(VOLUNTEER_ID), with_observations(step_one(), 4)).await;

    let mut correction = with_observations(step_one(), 2);
    correction["surveyComments"] = json!("recount after review");
    correction["observations"] = json!([{ "birdSpeciesId": 14, "adults": 5, "juveniles": 2 }]);

    let response = put(&app, &uri, Caller::Volunteer(VOLUNTEER_ID), correction).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["step"], 4);
    assert_eq!(data["surveyComments"], "recount after review");
    assert_eq!(data["observations"].as_array().unwrap().len(), 1);
    assert_eq!(data["observations"][0]["adults"], 5);
}

#[tokio::test]
async fn test_update_unknown_survey_is_user_error() {
    let app = test_app();
    let uri = format!("{}/{}", BASE, Uuid::new_v4());

    let response = put(&app, &uri, Caller::Volunteer(VOLUNTEER_ID), step_one()).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "USER_ERROR");
}

#[tokio::test]
async fn test_update_nil_identifier_is_bad_request() {
    let app = test_app();
    let uri = format!("{}/{}", BASE, Uuid::nil());

    let response = put(&app, &uri, Caller::Volunteer(VOLUNTEER_ID), step_one()).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_get_unknown_survey_is_not_found() {
    let app = test_app();
    let uri = format!("{}/{}", BASE, Uuid::new_v4());

    let response = get(&app, &uri, Caller::Volunteer(VOLUNTEER_ID)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_for_submitter_without_surveys_is_not_found() {
    let app = test_app();
    start_survey(&app).await;

    let response = get(&app, &format!("{}?userId=55", BASE), Caller::Volunteer(55)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let app = test_app();

    let mut older = step_one();
    older["startDate"] = json!("2016-05-01T08:00:00");
    post(&app, BASE, Caller::Volunteer(VOLUNTEER_ID), older).await;

    let mut undated = step_one();
    undated["startDate"] = Value::Null;
    post(&app, BASE, Caller::Volunteer(VOLUNTEER_ID), undated).await;

    let newer = step_one();
    post(&app, BASE, Caller::Volunteer(VOLUNTEER_ID), newer).await;

    let list = get(
        &app,
        &format!("{}?userId={}", BASE, VOLUNTEER_ID),
        Caller::Volunteer(VOLUNTEER_ID),
    )
    .await;

    assert_eq!(list.body["meta"]["count"], 3);
    assert_eq!(list.body["data"][0]["startDate"], "6/4/2016");
    assert_eq!(list.body["data"][1]["startDate"], "5/1/2016");
    assert_eq!(list.body["data"][2]["startDate"], "missing");
}

#[tokio::test]
async fn test_list_without_user_id_is_enveloped_bad_request() {
    let app = test_app();

    let response = get(&app, BASE, Caller::Volunteer(VOLUNTEER_ID)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_malformed_identifier_is_enveloped_bad_request() {
    let app = test_app();

    let response = get(&app, &format!("{}/not-a-uuid", BASE), Caller::Volunteer(VOLUNTEER_ID)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["code"], "BAD_REQUEST");
}
