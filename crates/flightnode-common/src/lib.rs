//! FlightNode Common Library
//!
//! Shared error kinds, validation, password hashing and logging for the
//! FlightNode workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the three error kinds every domain operation reports
//! - **Validation**: declarative required / max-length style field rules
//! - **Passwords**: salted, iterated SHA-256 hashing
//! - **Logging**: `tracing` subscriber setup
//!
//! # Example
//!
//! ```
//! use flightnode_common::validation::{Validate, Validator};
//! use flightnode_common::Result;
//!
//! struct WorkType {
//!     description: String,
//! }
//!
//! impl Validate for WorkType {
//!     fn validate(&self) -> Result<()> {
//!         Validator::new()
//!             .required("description", &self.description)
//!             .max_length("description", Some(&self.description), 100)
//!             .finish()
//!     }
//! }
//!
//! assert!(WorkType { description: "Nest monitoring".into() }.validate().is_ok());
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod logging;
pub mod password;
pub mod validation;

// Re-export commonly used types
pub use error::{FlightNodeError, Result, ValidationResult};
