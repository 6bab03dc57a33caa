//! User accounts, self-registration and approval

pub mod manager;
pub mod models;
pub mod routes;

pub use manager::{UserDomainManager, UserManager};
pub use models::{PasswordModel, PasswordResetModel, PendingUserModel, UserModel};
pub use routes::users_routes;
