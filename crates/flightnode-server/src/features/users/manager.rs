use std::sync::Arc;

use async_trait::async_trait;
use flightnode_common::password::{hash_password, verify_password};
use flightnode_common::validation::{Validate, Validator};
use flightnode_common::{FlightNodeError, Result};

use super::models::{PasswordModel, PendingUserModel, UserModel};
use crate::db::{DbError, UserPersistence};
use crate::models::{User, UserRole, UserStatus};

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 100;

/// Domain operations on user accounts
#[async_trait]
pub trait UserDomainManager: Send + Sync {
    /// Active and inactive users; pending registrations are excluded
    async fn find_all(&self) -> Result<Vec<UserModel>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>>;

    async fn create(&self, input: UserModel) -> Result<UserModel>;

    /// Self-registration: pending status, volunteer role only
    async fn create_pending(&self, input: UserModel) -> Result<UserModel>;

    async fn update(&self, input: UserModel) -> Result<()>;

    async fn change_password(&self, id: i32, change: PasswordModel) -> Result<()>;

    async fn administrative_password_change(&self, id: i32, new_password: &str) -> Result<()>;

    async fn find_all_pending(&self) -> Result<Vec<PendingUserModel>>;

    async fn approve(&self, ids: Vec<i32>) -> Result<()>;
}

pub struct UserManager {
    persistence: Arc<dyn UserPersistence>,
}

impl UserManager {
    pub fn new(persistence: Arc<dyn UserPersistence>) -> Self {
        Self { persistence }
    }

    async fn insert(&self, input: UserModel, status: UserStatus) -> Result<UserModel> {
        let mut user = input.to_user();
        user.status = status;

        let password = input.password.as_deref().unwrap_or_default();
        validate_all(&user, password_rules(Validator::new(), "password", password))?;
        self.ensure_user_name_free(&user.user_name, user.id).await?;

        let hashed = hash_password(password);
        user.password_hash = hashed.hash;
        user.password_salt = hashed.salt;

        let stored = self
            .persistence
            .insert(&user)
            .await
            .map_err(|e| duplicate_user_name(e, &user.user_name))?;

        tracing::info!(id = stored.id, status = %stored.status, "User created");
        Ok(stored.into())
    }

    /// User names are unique ignoring case; `id` may keep its own name
    async fn ensure_user_name_free(&self, user_name: &str, id: i32) -> Result<()> {
        match self.persistence.find_by_user_name(user_name).await? {
            Some(existing) if existing.id != id => Err(user_name_taken(user_name)),
            _ => Ok(()),
        }
    }

    async fn store_password(&self, id: i32, password: &str) -> Result<()> {
        let hashed = hash_password(password);
        if !self
            .persistence
            .update_password(id, &hashed.hash, &hashed.salt)
            .await?
        {
            return Err(FlightNodeError::user(format!("user {} does not exist", id)));
        }
        tracing::info!(id, "Password changed");
        Ok(())
    }
}

fn password_rules(validator: Validator, field: &str, password: &str) -> Validator {
    validator
        .required(field, password)
        .min_length(field, Some(password), PASSWORD_MIN_LENGTH)
        .max_length(field, Some(password), PASSWORD_MAX_LENGTH)
}

/// Entity constraints plus any extra rules, reported together
fn validate_all(user: &User, extra: Validator) -> Result<()> {
    let mut results = match user.validate() {
        Ok(()) => Vec::new(),
        Err(FlightNodeError::Validation(results)) => results,
        Err(other) => return Err(other),
    };
    if let Err(FlightNodeError::Validation(more)) = extra.finish() {
        results.extend(more);
    }
    if results.is_empty() {
        Ok(())
    } else {
        Err(FlightNodeError::Validation(results))
    }
}

fn duplicate_user_name(err: DbError, user_name: &str) -> FlightNodeError {
    match err {
        DbError::Duplicate(_) => user_name_taken(user_name),
        other => other.into(),
    }
}

fn user_name_taken(user_name: &str) -> FlightNodeError {
    FlightNodeError::validation(
        "user_name",
        format!("The user name {} is already taken.", user_name),
    )
}

#[async_trait]
impl UserDomainManager for UserManager {
    async fn find_all(&self) -> Result<Vec<UserModel>> {
        let users = self
            .persistence
            .find_all(&[UserStatus::Active, UserStatus::Inactive])
            .await?;
        Ok(users.into_iter().map(UserModel::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>> {
        Ok(self.persistence.find_by_id(id).await?.map(UserModel::from))
    }

    #[tracing::instrument(skip(self, input), fields(user_name = %input.user_name))]
    async fn create(&self, input: UserModel) -> Result<UserModel> {
        self.insert(input, UserStatus::Active).await
    }

    #[tracing::instrument(skip(self, input), fields(user_name = %input.user_name))]
    async fn create_pending(&self, input: UserModel) -> Result<UserModel> {
        let input = UserModel {
            roles: vec![UserRole::Volunteer.to_string()],
            ..input
        };
        self.insert(input, UserStatus::Pending).await
    }

    #[tracing::instrument(skip(self, input), fields(id = input.user_id))]
    async fn update(&self, input: UserModel) -> Result<()> {
        let user = input.to_user();
        user.validate()?;
        self.ensure_user_name_free(&user.user_name, user.id).await?;

        let updated = self
            .persistence
            .update_profile(&user)
            .await
            .map_err(|e| duplicate_user_name(e, &user.user_name))?;
        if !updated {
            return Err(FlightNodeError::user(format!("user {} does not exist", user.id)));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, change))]
    async fn change_password(&self, id: i32, change: PasswordModel) -> Result<()> {
        let Some(user) = self.persistence.find_by_id(id).await? else {
            return Err(FlightNodeError::user(format!("user {} does not exist", id)));
        };

        Validator::new()
            .check(
                verify_password(&change.current_password, &user.password_hash, &user.password_salt),
                "current_password",
                "The current password is incorrect.",
            )
            .finish()?;

        password_rules(Validator::new(), "new_password", &change.new_password)
            .check(
                change.new_password == change.confirm_password,
                "confirm_password",
                "The new password and confirmation password do not match.",
            )
            .finish()?;

        self.store_password(id, &change.new_password).await
    }

    #[tracing::instrument(skip(self, new_password))]
    async fn administrative_password_change(&self, id: i32, new_password: &str) -> Result<()> {
        password_rules(Validator::new(), "new_password", new_password).finish()?;
        self.store_password(id, new_password).await
    }

    async fn find_all_pending(&self) -> Result<Vec<PendingUserModel>> {
        let users = self.persistence.find_all(&[UserStatus::Pending]).await?;
        Ok(users.into_iter().map(PendingUserModel::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn approve(&self, ids: Vec<i32>) -> Result<()> {
        if ids.is_empty() {
            return Err(FlightNodeError::user("No users were selected for approval"));
        }
        let approved = self
            .persistence
            .transition_status(&ids, UserStatus::Pending, UserStatus::Active)
            .await?;
        tracing::info!(requested = ids.len(), approved, "Users approved");
        Ok(())
    }
}
