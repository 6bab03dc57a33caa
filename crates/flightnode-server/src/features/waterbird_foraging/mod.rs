//! Waterbird foraging surveys
//!
//! Multi-step tern foraging field surveys. A submitter starts a survey,
//! saves it step by step while it is pending, and completes it at step 4.

pub mod manager;
pub mod models;
pub mod routes;

pub use manager::{ForagingSurveyManager, WaterbirdForagingManager};
pub use models::{DisturbanceModel, ObservationModel, WaterbirdForagingListItem, WaterbirdForagingModel};
pub use routes::waterbird_foraging_routes;
