//! PostgreSQL user persistence

use async_trait::async_trait;
use sqlx::PgPool;

use super::constraints::map_unique_violation;
use super::persistence::UserPersistence;
use super::DbResult;
use crate::models::{User, UserStatus};

const USER_SELECT: &str = "SELECT id, user_name, email, given_name, family_name, \
     primary_phone_number, secondary_phone_number, county, mailing_address, city, state, \
     zip_code, roles, status, password_hash, password_salt FROM users";

#[derive(Clone)]
pub struct PgUserPersistence {
    pool: PgPool,
}

impl PgUserPersistence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserPersistence for PgUserPersistence {
    #[tracing::instrument(skip(self))]
    async fn find_all(&self, statuses: &[UserStatus]) -> DbResult<Vec<User>> {
        let statuses: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let sql = format!("{} WHERE status = ANY($1) ORDER BY family_name, given_name, id", USER_SELECT);
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(statuses)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> DbResult<Option<User>> {
        let sql = format!("{} WHERE id = $1", USER_SELECT);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_user_name(&self, user_name: &str) -> DbResult<Option<User>> {
        let sql = format!("{} WHERE lower(user_name) = lower($1)", USER_SELECT);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    #[tracing::instrument(skip(self, user), fields(user_name = %user.user_name))]
    async fn insert(&self, user: &User) -> DbResult<User> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO users (user_name, email, given_name, family_name, \
             primary_phone_number, secondary_phone_number, county, mailing_address, city, \
             state, zip_code, roles, status, password_hash, password_salt) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING id",
        )
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(&user.given_name)
        .bind(&user.family_name)
        .bind(&user.primary_phone_number)
        .bind(&user.secondary_phone_number)
        .bind(&user.county)
        .bind(&user.mailing_address)
        .bind(&user.city)
        .bind(&user.state)
        .bind(&user.zip_code)
        .bind(&user.roles)
        .bind(user.status)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "user", &user.user_name))?;

        tracing::info!(id, status = %user.status, "User created");

        Ok(User {
            id,
            ..user.clone()
        })
    }

    #[tracing::instrument(skip(self, user), fields(id = user.id))]
    async fn update_profile(&self, user: &User) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET user_name = $2, email = $3, given_name = $4, family_name = $5, \
             primary_phone_number = $6, secondary_phone_number = $7, county = $8, \
             mailing_address = $9, city = $10, state = $11, zip_code = $12, roles = $13 \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(&user.given_name)
        .bind(&user.family_name)
        .bind(&user.primary_phone_number)
        .bind(&user.secondary_phone_number)
        .bind(&user.county)
        .bind(&user.mailing_address)
        .bind(&user.city)
        .bind(&user.state)
        .bind(&user.zip_code)
        .bind(&user.roles)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "user", &user.user_name))?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, hash, salt))]
    async fn update_password(&self, id: i32, hash: &str, salt: &str) -> DbResult<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, password_salt = $3 WHERE id = $1")
                .bind(id)
                .bind(hash)
                .bind(salt)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn transition_status(
        &self,
        ids: &[i32],
        from: UserStatus,
        to: UserStatus,
    ) -> DbResult<u64> {
        let result =
            sqlx::query("UPDATE users SET status = $3 WHERE id = ANY($1) AND status = $2")
                .bind(ids)
                .bind(from)
                .bind(to)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
