//! Work type API routes
//!
//! - `GET /api/v1/worktypes` - List work types
//! - `GET /api/v1/worktypes/:id` - Get a single work type
//! - `POST /api/v1/worktypes` - Create a work type
//! - `PUT /api/v1/worktypes/:id` - Update a work type

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::manager::WorkTypeDomainManager;
use super::models::WorkTypeModel;
use crate::api::response::{ApiResponse, Created};
use crate::error::{ApiJson, ApiPath, AppError, AppResult};
use crate::middleware::CurrentUser;

pub type WorkTypeState = Arc<dyn WorkTypeDomainManager>;

pub fn work_types_routes() -> Router<WorkTypeState> {
    Router::new()
        .route("/", get(list_work_types).post(create_work_type))
        .route("/:id", get(get_work_type).put(update_work_type))
}

#[tracing::instrument(skip(manager))]
async fn list_work_types(
    State(manager): State<WorkTypeState>,
    _caller: CurrentUser,
) -> AppResult<Response> {
    let models: Vec<WorkTypeModel> = manager
        .find_all()
        .await?
        .into_iter()
        .map(WorkTypeModel::from)
        .collect();

    Ok(ApiResponse::success(models).into_response())
}

#[tracing::instrument(skip(manager))]
async fn get_work_type(
    State(manager): State<WorkTypeState>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Response> {
    match manager.find_by_id(id).await? {
        Some(work_type) => Ok(ApiResponse::success(WorkTypeModel::from(work_type)).into_response()),
        None => Err(AppError::NotFound(format!("work type {} not found", id))),
    }
}

/// `201 Created` with `Location: /api/v1/worktypes/{id}`
#[tracing::instrument(skip(manager, model), fields(caller = caller.id))]
async fn create_work_type(
    State(manager): State<WorkTypeState>,
    caller: CurrentUser,
    ApiJson(model): ApiJson<WorkTypeModel>,
) -> AppResult<Response> {
    let stored = manager.create(model.into()).await?;
    let location = format!("/api/v1/worktypes/{}", stored.id);

    Ok(Created::new(location, WorkTypeModel::from(stored)).into_response())
}

/// The id in the path wins over any id in the body
#[tracing::instrument(skip(manager, model), fields(caller = caller.id))]
async fn update_work_type(
    State(manager): State<WorkTypeState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(model): ApiJson<WorkTypeModel>,
) -> AppResult<StatusCode> {
    let model = WorkTypeModel { id, ..model };
    manager.update(model.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryCrudSet;
    use crate::features::work_types::manager::WorkTypeManager;
    use crate::models::WorkType;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn app() -> Router {
        let rows = vec![WorkType {
            id: 1,
            description: "Survey".into(),
        }];
        let manager: WorkTypeState =
            Arc::new(WorkTypeManager::new(Arc::new(MemoryCrudSet::with_rows(rows))));
        work_types_routes().with_state(manager)
    }

    #[tokio::test]
    async fn test_requires_caller() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/99")
                    .header("x-user-id", "1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_returns_no_content() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/1")
                    .header("x-user-id", "1")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"id": 7, "description": "Nest count"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
