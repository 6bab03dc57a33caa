pub mod response;

use std::net::SocketAddr;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;

use crate::config::{Config, CorsConfig};
use crate::db;
use crate::features::{self, FeatureState};
use crate::middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Absent when the managers run over in-memory persistence
    pub db: Option<PgPool>,
    pub features: FeatureState,
}

impl AppState {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            features: FeatureState::postgres(pool.clone()),
            db: Some(pool),
        }
    }

    pub fn new(features: FeatureState) -> Self {
        Self { db: None, features }
    }
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    let api_v1 = features::router(state.features.clone());

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(cors))
}

/// Bind and serve until a shutdown signal arrives
pub async fn serve(
    state: AppState,
    config: &Config,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    Ok(())
}

async fn health_check(State(state): State<AppState>) -> Response {
    let Some(pool) = state.db.as_ref() else {
        return (StatusCode::OK, Json(json!({ "status": "healthy", "database": "none" })))
            .into_response();
    };

    match db::health_check(pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": "unreachable" })),
            )
                .into_response()
        },
    }
}
