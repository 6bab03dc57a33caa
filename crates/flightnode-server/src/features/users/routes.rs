//! User API routes
//!
//! Administrators manage every account; other callers may read and edit
//! only their own profile and change only their own password.
//! Self-registration is the one anonymous endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use super::manager::UserDomainManager;
use super::models::{PasswordModel, PasswordResetModel, UserModel};
use crate::api::response::{ApiResponse, Created};
use crate::error::{ApiJson, ApiPath, AppError, AppResult};
use crate::middleware::CurrentUser;

pub type UserState = Arc<dyn UserDomainManager>;

pub fn users_routes() -> Router<UserState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/register", post(register_user))
        .route("/pending", get(list_pending_users))
        .route("/pending/approve", post(approve_users))
        .route("/:id", get(get_user).put(update_user))
        .route("/:id/password", put(change_password))
        .route("/:id/password/reset", put(reset_password))
}

#[tracing::instrument(skip(manager), fields(caller = caller.id))]
async fn list_users(State(manager): State<UserState>, caller: CurrentUser) -> AppResult<Response> {
    caller.require_admin()?;

    let users = manager.find_all().await?;
    let meta = json!({ "count": users.len() });
    Ok(ApiResponse::success_with_meta(users, meta).into_response())
}

#[tracing::instrument(skip(manager), fields(caller = caller.id))]
async fn get_user(
    State(manager): State<UserState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Response> {
    caller.require_admin_or_self(id)?;

    match manager.find_by_id(id).await? {
        Some(user) => Ok(ApiResponse::success(user).into_response()),
        None => Err(AppError::NotFound(format!("user {} not found", id))),
    }
}

#[tracing::instrument(skip(manager, model), fields(caller = caller.id))]
async fn create_user(
    State(manager): State<UserState>,
    caller: CurrentUser,
    ApiJson(model): ApiJson<UserModel>,
) -> AppResult<Response> {
    caller.require_admin()?;

    let created = manager.create(model).await?;
    let location = format!("/api/v1/users/{}", created.user_id);
    Ok(Created::new(location, created).into_response())
}

/// Anonymous sign-up; the account waits for administrator approval
#[tracing::instrument(skip(manager, model))]
async fn register_user(
    State(manager): State<UserState>,
    ApiJson(model): ApiJson<UserModel>,
) -> AppResult<Response> {
    let created = manager.create_pending(model).await?;
    let location = format!("/api/v1/users/{}", created.user_id);
    Ok(Created::new(location, created).into_response())
}

/// Non-administrators cannot change their own roles
#[tracing::instrument(skip(manager, model), fields(caller = caller.id))]
async fn update_user(
    State(manager): State<UserState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(model): ApiJson<UserModel>,
) -> AppResult<StatusCode> {
    caller.require_admin_or_self(id)?;

    let mut model = UserModel { user_id: id, ..model };
    if !caller.is_admin() {
        let existing = manager
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;
        model.roles = existing.roles;
    }

    manager.update(model).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(manager), fields(caller = caller.id))]
async fn list_pending_users(
    State(manager): State<UserState>,
    caller: CurrentUser,
) -> AppResult<Response> {
    caller.require_admin()?;

    let pending = manager.find_all_pending().await?;
    Ok(ApiResponse::success(pending).into_response())
}

#[tracing::instrument(skip(manager, ids), fields(caller = caller.id))]
async fn approve_users(
    State(manager): State<UserState>,
    caller: CurrentUser,
    ApiJson(ids): ApiJson<Vec<i32>>,
) -> AppResult<StatusCode> {
    caller.require_admin()?;

    manager.approve(ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(manager, change), fields(caller = caller.id))]
async fn change_password(
    State(manager): State<UserState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(change): ApiJson<PasswordModel>,
) -> AppResult<StatusCode> {
    caller.require_self(id)?;

    manager.change_password(id, change).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(manager, reset), fields(caller = caller.id))]
async fn reset_password(
    State(manager): State<UserState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(reset): ApiJson<PasswordResetModel>,
) -> AppResult<StatusCode> {
    caller.require_admin()?;

    manager
        .administrative_password_change(id, &reset.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
