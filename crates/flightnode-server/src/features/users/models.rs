use serde::{Deserialize, Serialize};

use crate::models::{User, UserStatus};

/// A user profile as exchanged with the API
///
/// `password` is accepted on create and never written back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserModel {
    pub user_id: i32,
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
    pub status: Option<UserStatus>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl UserModel {
    /// Entity without credentials; status defaults to active
    pub fn to_user(&self) -> User {
        User {
            id: self.user_id,
            user_name: self.user_name.trim().to_string(),
            email: self.email.trim().to_string(),
            given_name: self.given_name.clone(),
            family_name: self.family_name.clone(),
            primary_phone_number: self.primary_phone_number.clone(),
            secondary_phone_number: self.secondary_phone_number.clone(),
            county: self.county.clone(),
            mailing_address: self.mailing_address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            roles: self.roles.clone(),
            status: self.status.unwrap_or_default(),
            password_hash: String::new(),
            password_salt: String::new(),
        }
    }
}

impl From<User> for UserModel {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            user_name: user.user_name,
            email: user.email,
            given_name: user.given_name,
            family_name: user.family_name,
            primary_phone_number: user.primary_phone_number,
            secondary_phone_number: user.secondary_phone_number,
            county: user.county,
            mailing_address: user.mailing_address,
            city: user.city,
            state: user.state,
            zip_code: user.zip_code,
            roles: user.roles,
            status: Some(user.status),
            password: None,
        }
    }
}

/// Summary of a self-registered account awaiting approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUserModel {
    pub user_id: i32,
    pub display_name: String,
    pub email: String,
    pub primary_phone_number: Option<String>,
    pub secondary_phone_number: Option<String>,
    pub county: Option<String>,
}

impl From<User> for PendingUserModel {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            display_name: format!("{} {}", user.given_name, user.family_name),
            email: user.email,
            primary_phone_number: user.primary_phone_number,
            secondary_phone_number: user.secondary_phone_number,
            county: user.county,
        }
    }
}

/// Self-service password change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordModel {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Administrator-initiated password reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordResetModel {
    pub new_password: String,
}
