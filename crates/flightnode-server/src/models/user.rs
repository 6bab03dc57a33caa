use std::fmt;
use std::str::FromStr;

use flightnode_common::validation::{Validate, Validator};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account lifecycle state
///
/// Self-registered accounts start as `Pending` and become `Active` once an
/// administrator approves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles a user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Administrator,
    Coordinator,
    Reporter,
    Volunteer,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        Self::Administrator,
        Self::Coordinator,
        Self::Reporter,
        Self::Volunteer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Coordinator => "Coordinator",
            Self::Reporter => "Reporter",
            Self::Volunteer => "Volunteer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// A person with access to the system
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Default)]
pub struct User {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub primary_phone_number: Option<String>,
    pub secondary_phone_number: Option<String>,
    pub county: Option<String>,
    pub mailing_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub roles: Vec<String>,
    pub status: UserStatus,
    pub password_hash: String,
    pub password_salt: String,
}

impl User {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }
}

impl Validate for User {
    fn validate(&self) -> flightnode_common::Result<()> {
        let mut validator = Validator::new()
            .required("user_name", &self.user_name)
            .max_length("user_name", Some(&self.user_name), 256)
            .required("email", &self.email)
            .max_length("email", Some(&self.email), 256)
            .email("email", &self.email)
            .required("given_name", &self.given_name)
            .max_length("given_name", Some(&self.given_name), 50)
            .required("family_name", &self.family_name)
            .max_length("family_name", Some(&self.family_name), 50)
            .max_length("primary_phone_number", self.primary_phone_number.as_deref(), 20)
            .max_length("secondary_phone_number", self.secondary_phone_number.as_deref(), 20)
            .max_length("county", self.county.as_deref(), 100)
            .max_length("mailing_address", self.mailing_address.as_deref(), 100)
            .max_length("city", self.city.as_deref(), 50)
            .max_length("state", self.state.as_deref(), 2)
            .max_length("zip_code", self.zip_code.as_deref(), 10);

        for role in &self.roles {
            validator = validator.check(
                role.parse::<UserRole>().is_ok(),
                "roles",
                format!("The role {} is not recognized.", role),
            );
        }

        validator.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> User {
        User {
            user_name: "jdoe".to_string(),
            email: "jdoe@example.org".to_string(),
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
            roles: vec!["Volunteer".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_user() {
        assert!(valid_user().validate().is_ok());
    }

    #[test]
    fn test_state_is_two_letters() {
        let user = User {
            state: Some("Texas".to_string()),
            ..valid_user()
        };
        let err = user.validate().unwrap_err();
        assert!(err.field_messages().contains_key("state"));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let user = User {
            roles: vec!["Wizard".to_string()],
            ..valid_user()
        };
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("administrator".parse::<UserRole>().unwrap(), UserRole::Administrator);
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_has_role() {
        let user = valid_user();
        assert!(user.has_role(UserRole::Volunteer));
        assert!(!user.has_role(UserRole::Administrator));
    }
}
