use std::sync::Arc;

use async_trait::async_trait;
use flightnode_common::validation::Validate;
use flightnode_common::{FlightNodeError, Result};
use uuid::Uuid;

use crate::db::{PersistenceBase, SurveyPersistence};
use crate::models::{
    Location, Survey, SurveyState, COMPLETED_FORAGING_STEP_NUMBER, FIRST_FORAGING_STEP_NUMBER,
};

/// Domain operations on waterbird foraging surveys
///
/// A survey is created at step 1 in the pending set, whatever step was
/// submitted, and stays there while the submitter works through the form
/// steps. Saving with the completion step moves it to the completed set;
/// later saves of a completed survey update it in place.
#[async_trait]
pub trait WaterbirdForagingManager: Send + Sync {
    fn new_identifier(&self) -> Uuid;

    /// Pending set first, then completed
    async fn find_by_survey_id(&self, identifier: Uuid) -> Result<Option<Survey>>;

    async fn find_by_submitter_id(&self, user_id: i32) -> Result<Vec<Survey>>;

    async fn create(&self, survey: Survey) -> Result<Survey>;

    async fn update(&self, survey: Survey, step: i32) -> Result<Survey>;
}

pub struct ForagingSurveyManager {
    persistence: Arc<dyn SurveyPersistence>,
    locations: Arc<dyn PersistenceBase<Location>>,
}

impl ForagingSurveyManager {
    pub fn new(
        persistence: Arc<dyn SurveyPersistence>,
        locations: Arc<dyn PersistenceBase<Location>>,
    ) -> Self {
        Self {
            persistence,
            locations,
        }
    }

    async fn ensure_location(&self, location_id: i32) -> Result<()> {
        if self.locations.find_by_id(location_id).await?.is_none() {
            return Err(FlightNodeError::validation(
                "location_id",
                format!("Location {} does not exist.", location_id),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl WaterbirdForagingManager for ForagingSurveyManager {
    fn new_identifier(&self) -> Uuid {
        Uuid::new_v4()
    }

    async fn find_by_survey_id(&self, identifier: Uuid) -> Result<Option<Survey>> {
        if let Some(pending) = self.persistence.find_pending(identifier).await? {
            return Ok(Some(pending));
        }
        Ok(self.persistence.find_completed(identifier).await?)
    }

    async fn find_by_submitter_id(&self, user_id: i32) -> Result<Vec<Survey>> {
        Ok(self.persistence.find_by_submitter(user_id).await?)
    }

    #[tracing::instrument(skip(self, survey), fields(survey_identifier = %survey.survey_identifier))]
    async fn create(&self, mut survey: Survey) -> Result<Survey> {
        survey.step = FIRST_FORAGING_STEP_NUMBER;
        survey.validate()?;
        self.ensure_location(survey.location_id).await?;
        survey.stamp_children();
        survey.state = SurveyState::Pending;

        let stored = self.persistence.insert_pending(&survey).await?;
        tracing::info!(step = stored.step, "Foraging survey created");
        Ok(stored)
    }

    #[tracing::instrument(skip(self, survey), fields(survey_identifier = %survey.survey_identifier))]
    async fn update(&self, mut survey: Survey, step: i32) -> Result<Survey> {
        survey.step = step;
        survey.validate()?;
        self.ensure_location(survey.location_id).await?;
        survey.stamp_children();

        let identifier = survey.survey_identifier;
        let pending = self.persistence.find_pending(identifier).await?;

        let Some(pending) = pending else {
            let Some(completed) = self.persistence.find_completed(identifier).await? else {
                return Err(survey_missing(identifier));
            };

            survey.id = completed.id;
            survey.step = COMPLETED_FORAGING_STEP_NUMBER;
            survey.state = SurveyState::Completed;
            if !self.persistence.update_completed(&survey).await? {
                return Err(survey_missing(identifier));
            }
            tracing::info!("Completed foraging survey updated");
            return Ok(survey);
        };

        survey.id = pending.id;
        if step == COMPLETED_FORAGING_STEP_NUMBER {
            let completed = self.persistence.promote_to_completed(&survey).await?;
            tracing::info!("Foraging survey completed");
            return Ok(completed);
        }

        survey.state = SurveyState::Pending;
        if !self.persistence.update_pending(&survey).await? {
            return Err(survey_missing(identifier));
        }
        tracing::debug!(step, "Pending foraging survey updated");
        Ok(survey)
    }
}

fn survey_missing(identifier: Uuid) -> FlightNodeError {
    FlightNodeError::user(format!("survey {} does not exist", identifier))
}
