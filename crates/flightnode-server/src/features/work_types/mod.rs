//! Work types: categories of volunteer work

pub mod manager;
pub mod models;
pub mod routes;

pub use manager::{WorkTypeDomainManager, WorkTypeManager};
pub use models::WorkTypeModel;
pub use routes::work_types_routes;
