use flightnode_common::validation::{Validate, Validator};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Entity;

/// A survey site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Default)]
pub struct Location {
    pub id: i32,
    pub site_name: String,
    pub site_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Entity for Location {
    const TABLE: &'static str = "locations";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Validate for Location {
    fn validate(&self) -> flightnode_common::Result<()> {
        Validator::new()
            .required("site_name", &self.site_name)
            .max_length("site_name", Some(&self.site_name), 100)
            .max_length("site_code", self.site_code.as_deref(), 20)
            .finish()
    }
}
