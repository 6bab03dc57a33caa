use chrono::NaiveDateTime;
use flightnode_common::validation::{Validate, Validator};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Survey type id of the waterbird (tern) foraging survey
pub const SURVEY_TYPE_TERN_FORAGING: i32 = 2;

/// Step every new foraging survey starts at
pub const FIRST_FORAGING_STEP_NUMBER: i32 = 1;

/// Step at which a foraging survey is considered complete
pub const COMPLETED_FORAGING_STEP_NUMBER: i32 = 4;

const COMMENTS_MAX_LENGTH: usize = 500;
const RESULT_MAX_LENGTH: usize = 100;

/// Which set a survey is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SurveyState {
    #[default]
    Pending,
    Completed,
}

/// A survey in progress or completed
///
/// `survey_identifier` is stable across the pending → completed move and
/// links the survey to its observations, disturbances and observers. Rows
/// read from storage carry `location_name` joined from `locations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Default)]
pub struct Survey {
    pub id: i32,
    pub survey_identifier: Uuid,
    pub survey_type_id: i32,
    pub location_id: i32,
    #[sqlx(default)]
    pub location_name: Option<String>,
    pub submitted_by: i32,
    pub step: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub time_of_low_tide: Option<NaiveDateTime>,
    pub assessment_id: Option<i32>,
    pub access_point_id: Option<i32>,
    pub vantage_point_id: Option<i32>,
    pub tide_id: Option<i32>,
    pub weather_id: Option<i32>,
    pub start_temperature: Option<i32>,
    pub end_temperature: Option<i32>,
    pub wind_speed: Option<i32>,
    pub general_comments: Option<String>,
    pub disturbance_comments: Option<String>,
    #[sqlx(skip)]
    pub observations: Vec<Observation>,
    #[sqlx(skip)]
    pub disturbances: Vec<Disturbance>,
    #[sqlx(skip)]
    pub observers: Vec<i32>,
    #[sqlx(skip)]
    pub state: SurveyState,
}

impl Survey {
    /// True once the survey lives in the completed set
    pub fn is_complete(&self) -> bool {
        self.state == SurveyState::Completed
    }

    /// Copy the survey identifier into every child record
    pub fn stamp_children(&mut self) {
        let identifier = self.survey_identifier;
        for observation in &mut self.observations {
            observation.survey_identifier = identifier;
        }
        for disturbance in &mut self.disturbances {
            disturbance.survey_identifier = identifier;
        }
    }
}

impl Validate for Survey {
    fn validate(&self) -> flightnode_common::Result<()> {
        let mut validator = Validator::new()
            .required_id("location_id", self.location_id)
            .check(
                (1..=COMPLETED_FORAGING_STEP_NUMBER).contains(&self.step),
                "step",
                format!(
                    "The field step must be between 1 and {}.",
                    COMPLETED_FORAGING_STEP_NUMBER
                ),
            )
            .max_length(
                "general_comments",
                self.general_comments.as_deref(),
                COMMENTS_MAX_LENGTH,
            )
            .max_length(
                "disturbance_comments",
                self.disturbance_comments.as_deref(),
                COMMENTS_MAX_LENGTH,
            );

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            validator = validator.check(
                end >= start,
                "end_date",
                "The end date must not be before the start date.",
            );
        }

        for (index, observation) in self.observations.iter().enumerate() {
            validator = validator.nested("observations", index, observation);
        }
        for (index, disturbance) in self.disturbances.iter().enumerate() {
            validator = validator.nested("disturbances", index, disturbance);
        }

        validator.finish()
    }
}

/// Bird counts for one species during a survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Default)]
pub struct Observation {
    pub id: i32,
    pub survey_identifier: Uuid,
    pub bird_species_id: i32,
    /// Adults
    pub bin1: i32,
    /// Juveniles
    pub bin2: i32,
    pub feeding_success_rate: Option<i32>,
    pub habitat_type_id: Option<i32>,
    pub primary_activity_id: Option<i32>,
    pub secondary_activity_id: Option<i32>,
}

impl Validate for Observation {
    fn validate(&self) -> flightnode_common::Result<()> {
        Validator::new()
            .required_id("bird_species_id", self.bird_species_id)
            .non_negative("bin1", self.bin1)
            .non_negative("bin2", self.bin2)
            .finish()
    }
}

/// A disturbance event witnessed during a survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Default)]
pub struct Disturbance {
    pub id: i32,
    pub survey_identifier: Uuid,
    pub disturbance_type_id: i32,
    pub quantity: i32,
    pub duration_minutes: i32,
    pub result: String,
}

impl Validate for Disturbance {
    fn validate(&self) -> flightnode_common::Result<()> {
        Validator::new()
            .required_id("disturbance_type_id", self.disturbance_type_id)
            .non_negative("quantity", self.quantity)
            .non_negative("duration_minutes", self.duration_minutes)
            .required("result", &self.result)
            .max_length("result", Some(&self.result), RESULT_MAX_LENGTH)
            .finish()
    }
}
