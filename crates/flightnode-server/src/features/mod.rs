//! Feature modules implementing the FlightNode API
//!
//! Each feature is a vertical slice:
//! - `manager.rs` - domain manager trait and its implementation over the
//!   persistence traits
//! - `models.rs` - wire models (camelCase JSON) and entity mapping
//! - `routes.rs` - HTTP handlers
//!
//! # Features
//!
//! - **work_types**: categories of volunteer work
//! - **waterbird_foraging**: multi-step tern foraging surveys
//! - **users**: accounts, self-registration and approval

pub mod users;
pub mod waterbird_foraging;
pub mod work_types;

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::db::{PgCrudSet, PgSurveyPersistence, PgUserPersistence};
use crate::models::{Location, WorkType};
use users::{UserDomainManager, UserManager};
use waterbird_foraging::{ForagingSurveyManager, WaterbirdForagingManager};
use work_types::{WorkTypeDomainManager, WorkTypeManager};

/// Domain managers shared by the feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub work_types: Arc<dyn WorkTypeDomainManager>,
    pub surveys: Arc<dyn WaterbirdForagingManager>,
    pub users: Arc<dyn UserDomainManager>,
}

impl FeatureState {
    /// Managers backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        let locations = Arc::new(PgCrudSet::<Location>::new(pool.clone()));

        Self {
            work_types: Arc::new(WorkTypeManager::new(Arc::new(PgCrudSet::<WorkType>::new(
                pool.clone(),
            )))),
            surveys: Arc::new(ForagingSurveyManager::new(
                Arc::new(PgSurveyPersistence::new(pool.clone())),
                locations,
            )),
            users: Arc::new(UserManager::new(Arc::new(PgUserPersistence::new(pool)))),
        }
    }
}

/// Creates the API router with all feature routes mounted
///
/// - `/worktypes` - Work types
/// - `/waterbirdforagingsurvey` - Waterbird foraging surveys
/// - `/users` - User accounts
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/worktypes", work_types::work_types_routes().with_state(state.work_types))
        .nest(
            "/waterbirdforagingsurvey",
            waterbird_foraging::waterbird_foraging_routes().with_state(state.surveys),
        )
        .nest("/users", users::users_routes().with_state(state.users))
}
