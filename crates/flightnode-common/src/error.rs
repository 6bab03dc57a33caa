//! Error kinds shared by every FlightNode component
//!
//! Domain code reports failures through these kinds, and the HTTP layer
//! translates them uniformly:
//!
//! - [`FlightNodeError::Validation`]: one or more fields failed a declarative rule
//! - [`FlightNodeError::User`]: the request is well-formed but cannot be honoured
//! - [`FlightNodeError::Conflict`]: the record collides with one already stored
//! - [`FlightNodeError::Server`]: anything else; logged and reported as a 500

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for FlightNode domain operations
pub type Result<T> = std::result::Result<T, FlightNodeError>;

/// A single failed validation rule
///
/// `member_names` lists the fields the message applies to; most rules name
/// exactly one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub message: String,
    pub member_names: Vec<String>,
}

impl ValidationResult {
    pub fn new(message: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            member_names: vec![member.into()],
        }
    }
}

/// Main error type for FlightNode domain operations
#[derive(Error, Debug)]
pub enum FlightNodeError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationResult>),

    #[error("{0}")]
    User(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Server error: {message}")]
    Server {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FlightNodeError {
    /// Validation failure on a single field
    pub fn validation(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![ValidationResult::new(message, member)])
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Wrap an underlying failure as a server error
    pub fn server<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Server {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn server_message(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
            source: None,
        }
    }

    /// Group validation messages by field name
    ///
    /// Returns an empty map for non-validation errors.
    pub fn field_messages(&self) -> BTreeMap<String, Vec<String>> {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Self::Validation(results) = self {
            for result in results {
                for member in &result.member_names {
                    fields
                        .entry(member.clone())
                        .or_default()
                        .push(result.message.clone());
                }
            }
        }
        fields
    }
}

fn summarize(results: &[ValidationResult]) -> String {
    results
        .iter()
        .map(|r| r.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_messages() {
        let err = FlightNodeError::Validation(vec![
            ValidationResult::new("Description is required", "description"),
            ValidationResult::new("Name is too long", "name"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Description is required; Name is too long"
        );
    }

    #[test]
    fn test_field_messages_groups_by_member() {
        let err = FlightNodeError::Validation(vec![
            ValidationResult::new("first", "description"),
            ValidationResult::new("second", "description"),
            ValidationResult {
                message: "shared".to_string(),
                member_names: vec!["a".to_string(), "b".to_string()],
            },
        ]);

        let fields = err.field_messages();
        assert_eq!(fields["description"], vec!["first", "second"]);
        assert_eq!(fields["a"], vec!["shared"]);
        assert_eq!(fields["b"], vec!["shared"]);
    }

    #[test]
    fn test_field_messages_empty_for_user_error() {
        assert!(FlightNodeError::user("nope").field_messages().is_empty());
    }

    #[test]
    fn test_server_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = FlightNodeError::server("could not save", io);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk on fire"));
    }
}
