//! Waterbird foraging wire models and their mapping to [`Survey`]
//!
//! The wire names follow the field sheet the volunteers fill in, so several
//! of them differ from the entity names (`siteTypeId` is the assessment,
//! `adults` is bin 1, a disturbance `behavior` is its result).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Disturbance, Observation, Survey, SURVEY_TYPE_TERN_FORAGING};

/// Placeholder for list values that were never recorded
pub const MISSING: &str = "missing";
pub const STATUS_COMPLETE: &str = "Complete";
pub const STATUS_PENDING: &str = "Pending";

const LIST_DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ObservationModel {
    pub observation_id: i32,
    pub bird_species_id: i32,
    pub adults: i32,
    pub juveniles: i32,
    pub feeding_id: Option<i32>,
    pub habitat_id: Option<i32>,
    pub primary_activity_id: Option<i32>,
    pub secondary_activity_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DisturbanceModel {
    pub disturbance_id: i32,
    pub disturbance_type_id: i32,
    pub quantity: i32,
    pub duration_minutes: i32,
    pub behavior: String,
}

/// A complete waterbird foraging survey as submitted and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WaterbirdForagingModel {
    pub survey_id: i32,
    pub survey_identifier: Uuid,
    pub location_id: i32,
    pub access_point_info_id: Option<i32>,
    pub site_type_id: Option<i32>,
    pub disturbance_comments: Option<String>,
    pub survey_comments: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub temperature: Option<i32>,
    pub tide_info_id: Option<i32>,
    pub time_of_low_tide: Option<NaiveDateTime>,
    pub vantage_point_info_id: Option<i32>,
    pub weather_info_id: Option<i32>,
    pub wind_speed: Option<i32>,
    pub step: i32,
    pub observations: Vec<ObservationModel>,
    pub disturbances: Vec<DisturbanceModel>,
    pub observers: Vec<i32>,
}

impl WaterbirdForagingModel {
    /// Build the entity for `identifier` as submitted by `submitted_by`
    ///
    /// The identifier is stamped into every child record; the survey type is
    /// always tern foraging and no end temperature is recorded on this form.
    pub fn into_survey(self, identifier: Uuid, submitted_by: i32) -> Survey {
        let mut survey = Survey {
            id: self.survey_id,
            survey_identifier: identifier,
            survey_type_id: SURVEY_TYPE_TERN_FORAGING,
            location_id: self.location_id,
            location_name: None,
            submitted_by,
            step: self.step,
            start_date: self.start_date,
            end_date: self.end_date,
            time_of_low_tide: self.time_of_low_tide,
            assessment_id: self.site_type_id,
            access_point_id: self.access_point_info_id,
            vantage_point_id: self.vantage_point_info_id,
            tide_id: self.tide_info_id,
            weather_id: self.weather_info_id,
            start_temperature: self.temperature,
            end_temperature: None,
            wind_speed: self.wind_speed,
            general_comments: self.survey_comments,
            disturbance_comments: self.disturbance_comments,
            observations: self.observations.into_iter().map(Observation::from).collect(),
            disturbances: self.disturbances.into_iter().map(Disturbance::from).collect(),
            observers: self.observers,
            state: Default::default(),
        };
        survey.stamp_children();
        survey
    }
}

impl From<Survey> for WaterbirdForagingModel {
    fn from(survey: Survey) -> Self {
        Self {
            survey_id: survey.id,
            survey_identifier: survey.survey_identifier,
            location_id: survey.location_id,
            access_point_info_id: survey.access_point_id,
            site_type_id: survey.assessment_id,
            disturbance_comments: survey.disturbance_comments,
            survey_comments: survey.general_comments,
            start_date: survey.start_date,
            end_date: survey.end_date,
            temperature: survey.start_temperature,
            tide_info_id: survey.tide_id,
            time_of_low_tide: survey.time_of_low_tide,
            vantage_point_info_id: survey.vantage_point_id,
            weather_info_id: survey.weather_id,
            wind_speed: survey.wind_speed,
            step: survey.step,
            observations: survey.observations.into_iter().map(ObservationModel::from).collect(),
            disturbances: survey.disturbances.into_iter().map(DisturbanceModel::from).collect(),
            observers: survey.observers,
        }
    }
}

impl From<ObservationModel> for Observation {
    fn from(model: ObservationModel) -> Self {
        Self {
            id: model.observation_id,
            survey_identifier: Uuid::nil(),
            bird_species_id: model.bird_species_id,
            bin1: model.adults,
            bin2: model.juveniles,
            feeding_success_rate: model.feeding_id,
            habitat_type_id: model.habitat_id,
            primary_activity_id: model.primary_activity_id,
            secondary_activity_id: model.secondary_activity_id,
        }
    }
}

impl From<Observation> for ObservationModel {
    fn from(entity: Observation) -> Self {
        Self {
            observation_id: entity.id,
            bird_species_id: entity.bird_species_id,
            adults: entity.bin1,
            juveniles: entity.bin2,
            feeding_id: entity.feeding_success_rate,
            habitat_id: entity.habitat_type_id,
            primary_activity_id: entity.primary_activity_id,
            secondary_activity_id: entity.secondary_activity_id,
        }
    }
}

impl From<DisturbanceModel> for Disturbance {
    fn from(model: DisturbanceModel) -> Self {
        Self {
            id: model.disturbance_id,
            survey_identifier: Uuid::nil(),
            disturbance_type_id: model.disturbance_type_id,
            quantity: model.quantity,
            duration_minutes: model.duration_minutes,
            result: model.behavior,
        }
    }
}

impl From<Disturbance> for DisturbanceModel {
    fn from(entity: Disturbance) -> Self {
        Self {
            disturbance_id: entity.id,
            disturbance_type_id: entity.disturbance_type_id,
            quantity: entity.quantity,
            duration_minutes: entity.duration_minutes,
            behavior: entity.result,
        }
    }
}

/// One row of a submitter's survey list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterbirdForagingListItem {
    pub survey_identifier: Uuid,
    pub location: String,
    pub start_date: String,
    pub status: String,
    pub survey_comments: Option<String>,
}

impl From<Survey> for WaterbirdForagingListItem {
    fn from(survey: Survey) -> Self {
        let status = if survey.is_complete() {
            STATUS_COMPLETE
        } else {
            STATUS_PENDING
        };

        Self {
            survey_identifier: survey.survey_identifier,
            location: survey.location_name.unwrap_or_else(|| MISSING.to_string()),
            start_date: survey
                .start_date
                .map(|d| d.format(LIST_DATE_FORMAT).to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            status: status.to_string(),
            survey_comments: survey.general_comments,
        }
    }
}
