//! Waterbird foraging survey API routes
//!
//! - `GET /api/v1/waterbirdforagingsurvey/:surveyIdentifier` - Get one survey
//! - `GET /api/v1/waterbirdforagingsurvey?userId=N` - List a submitter's surveys
//! - `POST /api/v1/waterbirdforagingsurvey` - Start a new survey
//! - `PUT /api/v1/waterbirdforagingsurvey/:surveyIdentifier` - Save a step

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::manager::WaterbirdForagingManager;
use super::models::{WaterbirdForagingListItem, WaterbirdForagingModel};
use crate::api::response::{ApiResponse, Created};
use crate::error::{ApiJson, ApiPath, ApiQuery, AppError, AppResult};
use crate::middleware::CurrentUser;

pub type ForagingState = Arc<dyn WaterbirdForagingManager>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitterQuery {
    pub user_id: i32,
}

pub fn waterbird_foraging_routes() -> Router<ForagingState> {
    Router::new()
        .route("/", get(list_surveys).post(create_survey))
        .route("/:survey_identifier", get(get_survey).put(update_survey))
}

#[tracing::instrument(skip(manager))]
async fn get_survey(
    State(manager): State<ForagingState>,
    _caller: CurrentUser,
    ApiPath(survey_identifier): ApiPath<Uuid>,
) -> AppResult<Response> {
    match manager.find_by_survey_id(survey_identifier).await? {
        Some(survey) => {
            Ok(ApiResponse::success(WaterbirdForagingModel::from(survey)).into_response())
        },
        None => Err(AppError::NotFound(format!("survey {} not found", survey_identifier))),
    }
}

/// 404 when the submitter has no surveys at all
#[tracing::instrument(skip(manager))]
async fn list_surveys(
    State(manager): State<ForagingState>,
    _caller: CurrentUser,
    ApiQuery(query): ApiQuery<SubmitterQuery>,
) -> AppResult<Response> {
    let surveys = manager.find_by_submitter_id(query.user_id).await?;
    if surveys.is_empty() {
        return Err(AppError::NotFound(format!(
            "no surveys submitted by user {}",
            query.user_id
        )));
    }

    let items: Vec<WaterbirdForagingListItem> =
        surveys.into_iter().map(WaterbirdForagingListItem::from).collect();
    let meta = json!({ "count": items.len() });

    Ok(ApiResponse::success_with_meta(items, meta).into_response())
}

/// `201 Created` with `Location: /api/v1/waterbirdforagingsurvey/{identifier}`
#[tracing::instrument(skip(manager, model), fields(caller = caller.id))]
async fn create_survey(
    State(manager): State<ForagingState>,
    caller: CurrentUser,
    ApiJson(model): ApiJson<WaterbirdForagingModel>,
) -> AppResult<Response> {
    let identifier = manager.new_identifier();
    let survey = model.into_survey(identifier, caller.id);

    let stored = manager.create(survey).await?;
    let location = format!("/api/v1/waterbirdforagingsurvey/{}", identifier);

    Ok(Created::new(location, WaterbirdForagingModel::from(stored)).into_response())
}

/// Saves the submitted step and returns the survey as now stored
#[tracing::instrument(skip(manager, model), fields(caller = caller.id, step = model.step))]
async fn update_survey(
    State(manager): State<ForagingState>,
    caller: CurrentUser,
    ApiPath(survey_identifier): ApiPath<Uuid>,
    ApiJson(model): ApiJson<WaterbirdForagingModel>,
) -> AppResult<Response> {
    if survey_identifier.is_nil() {
        return Err(AppError::BadRequest("Invalid Survey Identifier".to_string()));
    }

    let step = model.step;
    let survey = model.into_survey(survey_identifier, caller.id);
    manager.update(survey, step).await?;

    let stored = manager
        .find_by_survey_id(survey_identifier)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("survey {} not found", survey_identifier)))?;

    Ok(ApiResponse::success(WaterbirdForagingModel::from(stored)).into_response())
}
