//! In-memory persistence
//!
//! Implementations of the persistence traits backed by plain collections.
//! They honour the same contracts as the PostgreSQL implementations (id
//! assignment, children replaced wholesale, unique user names) and back the
//! router-level tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::persistence::{PersistenceBase, SurveyPersistence, UserPersistence};
use super::surveys::submitter_order;
use super::{DbError, DbResult};
use crate::models::{Entity, Location, Survey, SurveyState, User, UserStatus, WorkType};

/// Entities whose storage id can be assigned on insert
pub trait AssignId: Entity {
    fn with_id(self, id: i32) -> Self;
}

impl AssignId for WorkType {
    fn with_id(self, id: i32) -> Self {
        Self { id, ..self }
    }
}

impl AssignId for Location {
    fn with_id(self, id: i32) -> Self {
        Self { id, ..self }
    }
}

pub struct MemoryCrudSet<T> {
    rows: RwLock<BTreeMap<i32, T>>,
}

impl<T: AssignId> MemoryCrudSet<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Seed with rows whose ids are already assigned
    pub fn with_rows(rows: impl IntoIterator<Item = T>) -> Self {
        Self {
            rows: RwLock::new(rows.into_iter().map(|r| (r.id(), r)).collect()),
        }
    }
}

impl<T: AssignId> Default for MemoryCrudSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: AssignId> PersistenceBase<T> for MemoryCrudSet<T> {
    async fn find_all(&self) -> DbResult<Vec<T>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> DbResult<Option<T>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, entity: &T) -> DbResult<T> {
        let mut rows = self.rows.write().await;
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let stored = entity.clone().with_id(id);
        rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: &T) -> DbResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(true)
            },
            None => Ok(false),
        }
    }
}

#[derive(Default)]
struct SurveySets {
    pending: BTreeMap<Uuid, Survey>,
    completed: BTreeMap<Uuid, Survey>,
    next_id: i32,
}

impl SurveySets {
    fn set(&mut self, state: SurveyState) -> &mut BTreeMap<Uuid, Survey> {
        match state {
            SurveyState::Pending => &mut self.pending,
            SurveyState::Completed => &mut self.completed,
        }
    }

    fn store(&mut self, survey: &Survey, state: SurveyState) -> Survey {
        self.next_id += 1;
        let stored = Survey {
            id: self.next_id,
            state,
            ..survey.clone()
        };
        self.set(state).insert(stored.survey_identifier, stored.clone());
        stored
    }

    fn replace(&mut self, survey: &Survey, state: SurveyState) -> bool {
        match self.set(state).get_mut(&survey.survey_identifier) {
            Some(existing) => {
                *existing = Survey {
                    id: existing.id,
                    state,
                    location_name: existing.location_name.clone(),
                    ..survey.clone()
                };
                true
            },
            None => false,
        }
    }
}

/// Survey sets; location names resolve against the seeded locations
#[derive(Default)]
pub struct MemorySurveyPersistence {
    sets: RwLock<SurveySets>,
    locations: BTreeMap<i32, String>,
}

impl MemorySurveyPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            sets: RwLock::new(SurveySets::default()),
            locations: locations.into_iter().map(|l| (l.id, l.site_name)).collect(),
        }
    }

    fn with_location_name(&self, mut survey: Survey) -> Survey {
        survey.location_name = self.locations.get(&survey.location_id).cloned();
        survey
    }
}

#[async_trait]
impl SurveyPersistence for MemorySurveyPersistence {
    async fn find_pending(&self, identifier: Uuid) -> DbResult<Option<Survey>> {
        let sets = self.sets.read().await;
        Ok(sets.pending.get(&identifier).cloned().map(|s| self.with_location_name(s)))
    }

    async fn find_completed(&self, identifier: Uuid) -> DbResult<Option<Survey>> {
        let sets = self.sets.read().await;
        Ok(sets.completed.get(&identifier).cloned().map(|s| self.with_location_name(s)))
    }

    async fn find_by_submitter(&self, user_id: i32) -> DbResult<Vec<Survey>> {
        let sets = self.sets.read().await;
        let mut surveys: Vec<Survey> = sets
            .pending
            .values()
            .chain(sets.completed.values())
            .filter(|s| s.submitted_by == user_id)
            .map(|s| Survey {
                observations: Vec::new(),
                disturbances: Vec::new(),
                observers: Vec::new(),
                ..self.with_location_name(s.clone())
            })
            .collect();
        surveys.sort_by(submitter_order);
        Ok(surveys)
    }

    async fn insert_pending(&self, survey: &Survey) -> DbResult<Survey> {
        let mut sets = self.sets.write().await;
        if sets.pending.contains_key(&survey.survey_identifier)
            || sets.completed.contains_key(&survey.survey_identifier)
        {
            return Err(DbError::duplicate("survey", &survey.survey_identifier.to_string()));
        }
        Ok(sets.store(survey, SurveyState::Pending))
    }

    async fn update_pending(&self, survey: &Survey) -> DbResult<bool> {
        Ok(self.sets.write().await.replace(survey, SurveyState::Pending))
    }

    async fn promote_to_completed(&self, survey: &Survey) -> DbResult<Survey> {
        let mut sets = self.sets.write().await;
        sets.pending.remove(&survey.survey_identifier);
        Ok(sets.store(survey, SurveyState::Completed))
    }

    async fn update_completed(&self, survey: &Survey) -> DbResult<bool> {
        Ok(self.sets.write().await.replace(survey, SurveyState::Completed))
    }
}

#[derive(Default)]
pub struct MemoryUserPersistence {
    users: RwLock<BTreeMap<i32, User>>,
}

impl MemoryUserPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }
}

fn name_taken(users: &BTreeMap<i32, User>, user_name: &str, except: i32) -> bool {
    users
        .values()
        .any(|u| u.id != except && u.user_name.eq_ignore_ascii_case(user_name))
}

#[async_trait]
impl UserPersistence for MemoryUserPersistence {
    async fn find_all(&self, statuses: &[UserStatus]) -> DbResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| statuses.contains(&u.status))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> DbResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> DbResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.user_name.eq_ignore_ascii_case(user_name))
            .cloned())
    }

    async fn insert(&self, user: &User) -> DbResult<User> {
        let mut users = self.users.write().await;
        if name_taken(&users, &user.user_name, 0) {
            return Err(DbError::duplicate("user", &user.user_name));
        }
        let id = users.keys().next_back().copied().unwrap_or(0) + 1;
        let stored = User {
            id,
            ..user.clone()
        };
        users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_profile(&self, user: &User) -> DbResult<bool> {
        let mut users = self.users.write().await;
        if name_taken(&users, &user.user_name, user.id) {
            return Err(DbError::duplicate("user", &user.user_name));
        }
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = User {
                    status: existing.status,
                    password_hash: existing.password_hash.clone(),
                    password_salt: existing.password_salt.clone(),
                    ..user.clone()
                };
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn update_password(&self, id: i32, hash: &str, salt: &str) -> DbResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = hash.to_string();
                user.password_salt = salt.to_string();
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn transition_status(
        &self,
        ids: &[i32],
        from: UserStatus,
        to: UserStatus,
    ) -> DbResult<u64> {
        let mut users = self.users.write().await;
        let mut changed = 0;
        for id in ids {
            if let Some(user) = users.get_mut(id).filter(|u| u.status == from) {
                user.status = to;
                changed += 1;
            }
        }
        Ok(changed)
    }
}
