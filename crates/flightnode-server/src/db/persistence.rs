//! Persistence contracts consumed by the domain managers

use async_trait::async_trait;
use uuid::Uuid;

use super::DbResult;
use crate::models::{Entity, Survey, User, UserStatus};

/// Generic CRUD set for a single entity type
#[async_trait]
pub trait PersistenceBase<T: Entity>: Send + Sync {
    async fn find_all(&self) -> DbResult<Vec<T>>;

    async fn find_by_id(&self, id: i32) -> DbResult<Option<T>>;

    /// Store a new row and return it with its assigned id
    async fn insert(&self, entity: &T) -> DbResult<T>;

    /// Returns `false` when no row matched `entity.id()`
    async fn update(&self, entity: &T) -> DbResult<bool>;
}

/// Pending and completed survey sets with their child records
///
/// Surveys returned by `find_pending` / `find_completed` carry their
/// observations, disturbances, observers and location name. Each write is
/// one unit of work.
#[async_trait]
pub trait SurveyPersistence: Send + Sync {
    async fn find_pending(&self, identifier: Uuid) -> DbResult<Option<Survey>>;

    async fn find_completed(&self, identifier: Uuid) -> DbResult<Option<Survey>>;

    /// Surveys from both sets without children, newest start date first
    async fn find_by_submitter(&self, user_id: i32) -> DbResult<Vec<Survey>>;

    async fn insert_pending(&self, survey: &Survey) -> DbResult<Survey>;

    /// Update the pending row and replace its children
    async fn update_pending(&self, survey: &Survey) -> DbResult<bool>;

    /// Move a survey from the pending set to the completed set
    async fn promote_to_completed(&self, survey: &Survey) -> DbResult<Survey>;

    async fn update_completed(&self, survey: &Survey) -> DbResult<bool>;
}

#[async_trait]
pub trait UserPersistence: Send + Sync {
    /// Users in any of the given states
    async fn find_all(&self, statuses: &[UserStatus]) -> DbResult<Vec<User>>;

    async fn find_by_id(&self, id: i32) -> DbResult<Option<User>>;

    async fn find_by_user_name(&self, user_name: &str) -> DbResult<Option<User>>;

    async fn insert(&self, user: &User) -> DbResult<User>;

    /// Update everything except credentials and status
    async fn update_profile(&self, user: &User) -> DbResult<bool>;

    async fn update_password(&self, id: i32, hash: &str, salt: &str) -> DbResult<bool>;

    /// Move the listed users currently in `from` to `to`; users in any
    /// other state are left alone. Returns the number of rows changed.
    async fn transition_status(&self, ids: &[i32], from: UserStatus, to: UserStatus)
        -> DbResult<u64>;
}
