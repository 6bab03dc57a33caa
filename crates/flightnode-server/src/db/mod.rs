//! Persistence layer
//!
//! Persistence is expressed as traits ([`PersistenceBase`],
//! [`SurveyPersistence`], [`UserPersistence`]) so domain managers can be
//! exercised against in-memory fakes. The PostgreSQL implementations use
//! runtime-checked `sqlx` queries; every multi-row write runs inside a single
//! transaction.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;

pub mod constraints;
pub mod crud_set;
pub mod memory;
pub mod persistence;
pub mod surveys;
pub mod users;

pub use crud_set::PgCrudSet;
pub use persistence::{PersistenceBase, SurveyPersistence, UserPersistence};
pub use surveys::PgSurveyPersistence;
pub use users::PgUserPersistence;

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Record already exists (unique constraint violation)
    #[error("{0}")]
    Duplicate(String),
}

impl DbError {
    /// Create a duplicate error with resource context
    pub fn duplicate(resource_type: &str, identifier: &str) -> Self {
        Self::Duplicate(format!("{} '{}' already exists", resource_type, identifier))
    }
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for flightnode_common::FlightNodeError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate(message) => flightnode_common::FlightNodeError::conflict(message),
            other => flightnode_common::FlightNodeError::server("Database operation failed", other),
        }
    }
}

pub async fn create_pool(config: &DatabaseConfig) -> DbResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

pub async fn health_check(pool: &PgPool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(DbError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message() {
        let err = DbError::duplicate("user", "jdoe");
        assert_eq!(err.to_string(), "user 'jdoe' already exists");
    }

    #[test]
    fn test_db_error_becomes_server_error() {
        let err: flightnode_common::FlightNodeError = DbError::Sqlx(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, flightnode_common::FlightNodeError::Server { .. }));
    }

    #[test]
    fn test_duplicate_becomes_conflict() {
        let err: flightnode_common::FlightNodeError = DbError::duplicate("survey", "abc").into();
        match err {
            flightnode_common::FlightNodeError::Conflict(message) => {
                assert_eq!(message, "survey 'abc' already exists")
            },
            other => panic!("expected conflict, got {:?}", other),
        }
    }
}
