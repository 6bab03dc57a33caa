//! HTTP middleware: CORS for the volunteer web client, request tracing and
//! caller identity extraction

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request},
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultOnResponse, MakeSpan, TraceLayer},
    LatencyUnit,
};
use tracing::{Level, Span};

use crate::config::CorsConfig;

pub mod auth;

pub use auth::{CurrentUser, USER_ID_HEADER, USER_ROLES_HEADER};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// `*` or an empty list accepts any origin, without credentials
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLES_HEADER),
        ])
        .expose_headers([header::LOCATION])
        .max_age(PREFLIGHT_MAX_AGE);

    let any_origin =
        config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*");
    if any_origin {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            },
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(config.allow_credentials)
}

/// Request span carrying the method, path and claimed caller id
#[derive(Clone, Copy, Debug, Default)]
pub struct CallerSpan;

impl MakeSpan<Body> for CallerSpan {
    fn make_span(&mut self, request: &Request<Body>) -> Span {
        let caller = request
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            caller = %caller,
        )
    }
}

pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, CallerSpan> {
    TraceLayer::new_for_http().make_span_with(CallerSpan).on_response(
        DefaultOnResponse::new()
            .level(Level::INFO)
            .latency_unit(LatencyUnit::Millis),
    )
}
