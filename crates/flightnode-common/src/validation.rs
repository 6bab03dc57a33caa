//! Declarative field validation
//!
//! Entities and API models describe their constraints with a [`Validator`]
//! chain; every failed rule is collected so the caller receives all field
//! errors at once rather than the first one.
//!
//! # Examples
//!
//! ```
//! use flightnode_common::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("description", "")
//!     .max_length("description", Some("short"), 100)
//!     .finish();
//!
//! assert!(result.is_err());
//! ```

use crate::error::{FlightNodeError, Result, ValidationResult};

/// Implemented by types that carry declarative constraints
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Collects failed rules for one object
#[derive(Debug, Default)]
pub struct Validator {
    results: Vec<ValidationResult>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value must contain non-whitespace text
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.fail(field, format!("The {} field is required.", field));
        }
        self
    }

    /// Identifier references must point at a stored row (ids start at 1)
    pub fn required_id(mut self, field: &str, value: i32) -> Self {
        if value <= 0 {
            self.fail(field, format!("The {} field is required.", field));
        }
        self
    }

    /// Maximum length in characters; `None` always passes
    pub fn max_length(mut self, field: &str, value: Option<&str>, max: usize) -> Self {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.fail(
                    field,
                    format!("The field {} must be a string with a maximum length of {}.", field, max),
                );
            }
        }
        self
    }

    /// Minimum length in characters; `None` always passes
    pub fn min_length(mut self, field: &str, value: Option<&str>, min: usize) -> Self {
        if let Some(value) = value {
            if value.chars().count() < min {
                self.fail(
                    field,
                    format!("The field {} must be a string with a minimum length of {}.", field, min),
                );
            }
        }
        self
    }

    /// Loose email shape check: one `@` with text on both sides
    pub fn email(mut self, field: &str, value: &str) -> Self {
        let valid = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            },
            None => false,
        };
        if !value.is_empty() && !valid {
            self.fail(field, format!("The {} field is not a valid e-mail address.", field));
        }
        self
    }

    /// Numeric value must not be negative
    pub fn non_negative(mut self, field: &str, value: i32) -> Self {
        if value < 0 {
            self.fail(field, format!("The field {} must not be negative.", field));
        }
        self
    }

    /// Arbitrary rule
    pub fn check(mut self, condition: bool, field: &str, message: impl Into<String>) -> Self {
        if !condition {
            self.fail(field, message.into());
        }
        self
    }

    /// Fold in the results of a child object under `prefix[index].`
    pub fn nested<T: Validate>(mut self, prefix: &str, index: usize, child: &T) -> Self {
        if let Err(FlightNodeError::Validation(results)) = child.validate() {
            for mut result in results {
                result.member_names = result
                    .member_names
                    .into_iter()
                    .map(|m| format!("{}[{}].{}", prefix, index, m))
                    .collect();
                self.results.push(result);
            }
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.results.is_empty()
    }

    pub fn finish(self) -> Result<()> {
        if self.results.is_empty() {
            Ok(())
        } else {
            tracing::debug!(failures = self.results.len(), "Validation failed");
            Err(FlightNodeError::Validation(self.results))
        }
    }

    fn fail(&mut self, field: &str, message: String) {
        self.results.push(ValidationResult::new(message, field));
    }
}
