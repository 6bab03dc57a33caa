//! Constraint violation helpers
//!
//! ```rust,ignore
//! sqlx::query("INSERT INTO users ...")
//!     .execute(&pool)
//!     .await
//!     .map_err(|e| map_unique_violation(e, "user", &user.user_name))?;
//! ```

use sqlx::Error as SqlxError;

use super::DbError;

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Translate a unique violation into [`DbError::Duplicate`], anything else into [`DbError::Sqlx`]
pub fn map_unique_violation(error: SqlxError, resource_type: &str, identifier: &str) -> DbError {
    if is_unique_violation(&error) {
        DbError::duplicate(resource_type, identifier)
    } else {
        DbError::Sqlx(error)
    }
}
