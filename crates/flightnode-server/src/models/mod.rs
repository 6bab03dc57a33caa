//! Persisted entities
//!
//! Plain records mirroring the database rows. Entities own no behaviour
//! beyond their declarative constraints (see [`Validate`] impls); mapping to
//! and from the wire lives in each feature's `models` module.
//!
//! [`Validate`]: flightnode_common::validation::Validate

pub mod location;
pub mod survey;
pub mod user;
pub mod work_type;

pub use location::Location;
pub use survey::{
    Disturbance, Observation, Survey, SurveyState, COMPLETED_FORAGING_STEP_NUMBER,
    FIRST_FORAGING_STEP_NUMBER, SURVEY_TYPE_TERN_FORAGING,
};
pub use user::{User, UserRole, UserStatus};
pub use work_type::WorkType;

/// Entities with an integer primary key assigned by storage
pub trait Entity: Send + Sync + Clone + 'static {
    /// Storage table backing this entity
    const TABLE: &'static str;

    fn id(&self) -> i32;
}
