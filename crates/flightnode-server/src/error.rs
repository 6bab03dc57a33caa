//! HTTP error translation
//!
//! [`AppError`] is the single place where domain, persistence and request
//! errors become HTTP responses. Validation, user and conflict errors are
//! expected outcomes and log at debug. Server errors log at error and never
//! leak their detail to the client.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flightnode_common::FlightNodeError;
use serde_json::json;
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::db::DbError;

pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] FlightNodeError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        AppError::Domain(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Domain(ref e @ FlightNodeError::Validation(_)) => {
                let fields = e.field_messages();
                tracing::debug!(fields = ?fields.keys().collect::<Vec<_>>(), "Request failed validation");
                let details = json!(fields);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details(
                        "VALIDATION_ERROR",
                        "One or more fields are invalid",
                        details,
                    ),
                )
            },
            AppError::Domain(FlightNodeError::User(ref message)) => {
                tracing::debug!(message = %message, "User error");
                (StatusCode::BAD_REQUEST, ErrorResponse::new("USER_ERROR", message.clone()))
            },
            AppError::Domain(FlightNodeError::Conflict(ref message)) => {
                tracing::debug!(message = %message, "Duplicate record");
                (StatusCode::CONFLICT, ErrorResponse::new("CONFLICT", message.clone()))
            },
            AppError::Domain(ref e @ FlightNodeError::Server { .. }) => {
                tracing::error!(error = ?e, "Server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
                )
            },
            AppError::NotFound(ref message) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new("NOT_FOUND", message.clone()))
            },
            AppError::Unauthorized(ref message) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::new("UNAUTHORIZED", message.clone()))
            },
            AppError::Forbidden(ref message) => {
                (StatusCode::FORBIDDEN, ErrorResponse::new("FORBIDDEN", message.clone()))
            },
            AppError::BadRequest(ref message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new("BAD_REQUEST", message.clone()))
            },
        };

        (status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejections render as 400 error envelopes
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor, rejections enveloped like [`ApiJson`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
