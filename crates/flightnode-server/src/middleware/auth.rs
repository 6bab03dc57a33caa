//! Caller identity
//!
//! Authentication happens upstream; the gateway forwards the caller as
//! `x-user-id` (integer user id) and `x-user-roles` (comma-separated role
//! names). Handlers take a [`CurrentUser`] argument to require a caller.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::models::UserRole;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLES_HEADER: &str = "x-user-roles";

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub roles: Vec<UserRole>,
}

impl CurrentUser {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Administrator)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Administrator role required".to_string()))
        }
    }

    /// Administrators may act on anyone; everyone else only on themselves
    pub fn require_admin_or_self(&self, user_id: i32) -> Result<(), AppError> {
        if self.is_admin() || self.id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Not permitted to act on user {}",
                user_id
            )))
        }
    }

    pub fn require_self(&self, user_id: i32) -> Result<(), AppError> {
        if self.id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Users may only change their own password".to_string(),
            ))
        }
    }
}

/// Unknown role names are ignored rather than rejected
fn parse_roles(raw: &str) -> Vec<UserRole> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| match s.parse::<UserRole>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unknown role");
                None
            },
        })
        .collect()
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::Unauthorized("Missing or invalid caller identity".to_string()))?;

        let roles = parts
            .headers
            .get(USER_ROLES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(parse_roles)
            .unwrap_or_default();

        Ok(CurrentUser { id, roles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<CurrentUser, AppError> {
        let (mut parts, _) = request.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_id_and_roles() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "12")
            .header(USER_ROLES_HEADER, "Reporter, administrator,Unknown")
            .body(())
            .unwrap();

        let user = extract(request).await.unwrap();
        assert_eq!(user.id, 12);
        assert_eq!(user.roles, vec![UserRole::Reporter, UserRole::Administrator]);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_missing_id_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(extract(request).await, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_malformed_id_is_unauthorized() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "abc")
            .body(())
            .unwrap();
        assert!(matches!(extract(request).await, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_admin_or_self() {
        let volunteer = CurrentUser {
            id: 5,
            roles: vec![UserRole::Volunteer],
        };
        assert!(volunteer.require_admin_or_self(5).is_ok());
        assert!(matches!(
            volunteer.require_admin_or_self(6),
            Err(AppError::Forbidden(_))
        ));
        assert!(volunteer.require_admin().is_err());
    }
}
