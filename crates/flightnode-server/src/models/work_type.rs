use flightnode_common::validation::{Validate, Validator};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Entity;

/// Maximum length of a work type description
pub const DESCRIPTION_MAX_LENGTH: usize = 100;

/// Category of volunteer work (e.g. "Survey", "Data entry")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Default)]
pub struct WorkType {
    pub id: i32,
    pub description: String,
}

impl Entity for WorkType {
    const TABLE: &'static str = "work_types";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Validate for WorkType {
    fn validate(&self) -> flightnode_common::Result<()> {
        Validator::new()
            .required("description", &self.description)
            .max_length("description", Some(&self.description), DESCRIPTION_MAX_LENGTH)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_required() {
        let work_type = WorkType {
            id: 0,
            description: " ".to_string(),
        };
        assert!(work_type.validate().is_err());
    }

    #[test]
    fn test_description_length_boundary() {
        let at_limit = WorkType {
            id: 1,
            description: "a".repeat(DESCRIPTION_MAX_LENGTH),
        };
        assert!(at_limit.validate().is_ok());

        let over_limit = WorkType {
            id: 1,
            description: "a".repeat(DESCRIPTION_MAX_LENGTH + 1),
        };
        assert!(over_limit.validate().is_err());
    }
}
