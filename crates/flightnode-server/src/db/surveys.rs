//! PostgreSQL survey persistence
//!
//! Pending and completed surveys live in two tables with identical layout.
//! Observations, disturbances and observers are keyed by the survey
//! identifier so they follow a survey from one set to the other without
//! being rewritten on promotion.
//!
//! # Schema Reference
//!
//! ```sql
//! CREATE TABLE surveys_pending (
//!     id SERIAL PRIMARY KEY,
//!     survey_identifier UUID NOT NULL UNIQUE,
//!     survey_type_id INTEGER NOT NULL,
//!     location_id INTEGER NOT NULL REFERENCES locations(id),
//!     submitted_by INTEGER NOT NULL,
//!     step INTEGER NOT NULL,
//!     ...
//! );
//! ```

use std::cmp::Ordering;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::constraints::map_unique_violation;
use super::persistence::SurveyPersistence;
use super::DbResult;
use crate::models::{Disturbance, Observation, Survey, SurveyState};

const SURVEY_COLUMNS: &str = "survey_identifier, survey_type_id, location_id, submitted_by, step, \
     start_date, end_date, time_of_low_tide, assessment_id, access_point_id, vantage_point_id, \
     tide_id, weather_id, start_temperature, end_temperature, wind_speed, general_comments, \
     disturbance_comments";

fn table(state: SurveyState) -> &'static str {
    match state {
        SurveyState::Pending => "surveys_pending",
        SurveyState::Completed => "surveys_completed",
    }
}

fn select_sql(state: SurveyState, filter: &str) -> String {
    format!(
        "SELECT s.id, s.survey_identifier, s.survey_type_id, s.location_id, \
         l.site_name AS location_name, s.submitted_by, s.step, s.start_date, s.end_date, \
         s.time_of_low_tide, s.assessment_id, s.access_point_id, s.vantage_point_id, s.tide_id, \
         s.weather_id, s.start_temperature, s.end_temperature, s.wind_speed, s.general_comments, \
         s.disturbance_comments \
         FROM {} s LEFT JOIN locations l ON l.id = s.location_id \
         WHERE {}",
        table(state),
        filter
    )
}

/// Newest start date first, undated surveys last, then by row id
pub(super) fn submitter_order(a: &Survey, b: &Survey) -> Ordering {
    match (a.start_date, b.start_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

#[derive(Clone)]
pub struct PgSurveyPersistence {
    pool: PgPool,
}

impl PgSurveyPersistence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_in(&self, state: SurveyState, identifier: Uuid) -> DbResult<Option<Survey>> {
        let mut conn = self.pool.acquire().await?;

        let sql = select_sql(state, "s.survey_identifier = $1");
        let survey = sqlx::query_as::<_, Survey>(&sql)
            .bind(identifier)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(mut survey) = survey else {
            return Ok(None);
        };

        survey.state = state;
        load_children(&mut conn, &mut survey).await?;
        Ok(Some(survey))
    }

    async fn find_submitted_in(&self, state: SurveyState, user_id: i32) -> DbResult<Vec<Survey>> {
        let sql = select_sql(state, "s.submitted_by = $1");
        let mut surveys = sqlx::query_as::<_, Survey>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        for survey in &mut surveys {
            survey.state = state;
        }
        Ok(surveys)
    }
}

async fn load_children(conn: &mut PgConnection, survey: &mut Survey) -> DbResult<()> {
    survey.observations = sqlx::query_as::<_, Observation>(
        "SELECT id, survey_identifier, bird_species_id, bin1, bin2, feeding_success_rate, \
         habitat_type_id, primary_activity_id, secondary_activity_id \
         FROM observations WHERE survey_identifier = $1 ORDER BY id",
    )
    .bind(survey.survey_identifier)
    .fetch_all(&mut *conn)
    .await?;

    survey.disturbances = sqlx::query_as::<_, Disturbance>(
        "SELECT id, survey_identifier, disturbance_type_id, quantity, duration_minutes, result \
         FROM disturbances WHERE survey_identifier = $1 ORDER BY id",
    )
    .bind(survey.survey_identifier)
    .fetch_all(&mut *conn)
    .await?;

    survey.observers = sqlx::query_scalar::<_, i32>(
        "SELECT user_id FROM survey_observers WHERE survey_identifier = $1 ORDER BY user_id",
    )
    .bind(survey.survey_identifier)
    .fetch_all(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_row(conn: &mut PgConnection, state: SurveyState, survey: &Survey) -> DbResult<i32> {
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
         $15, $16, $17, $18) RETURNING id",
        table(state),
        SURVEY_COLUMNS
    );
    let id = bind_survey(sqlx::query_scalar::<_, i32>(&sql), survey)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_unique_violation(e, "survey", &survey.survey_identifier.to_string()))?;
    Ok(id)
}

async fn update_row(conn: &mut PgConnection, state: SurveyState, survey: &Survey) -> DbResult<bool> {
    let sql = format!(
        "UPDATE {} SET survey_type_id = $2, location_id = $3, submitted_by = $4, step = $5, \
         start_date = $6, end_date = $7, time_of_low_tide = $8, assessment_id = $9, \
         access_point_id = $10, vantage_point_id = $11, tide_id = $12, weather_id = $13, \
         start_temperature = $14, end_temperature = $15, wind_speed = $16, \
         general_comments = $17, disturbance_comments = $18 \
         WHERE survey_identifier = $1 RETURNING id",
        table(state)
    );
    let updated = bind_survey(sqlx::query_scalar::<_, i32>(&sql), survey)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(updated.is_some())
}

fn bind_survey<'q>(
    query: sqlx::query::QueryScalar<'q, sqlx::Postgres, i32, sqlx::postgres::PgArguments>,
    survey: &'q Survey,
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i32, sqlx::postgres::PgArguments> {
    query
        .bind(survey.survey_identifier)
        .bind(survey.survey_type_id)
        .bind(survey.location_id)
        .bind(survey.submitted_by)
        .bind(survey.step)
        .bind(survey.start_date)
        .bind(survey.end_date)
        .bind(survey.time_of_low_tide)
        .bind(survey.assessment_id)
        .bind(survey.access_point_id)
        .bind(survey.vantage_point_id)
        .bind(survey.tide_id)
        .bind(survey.weather_id)
        .bind(survey.start_temperature)
        .bind(survey.end_temperature)
        .bind(survey.wind_speed)
        .bind(&survey.general_comments)
        .bind(&survey.disturbance_comments)
}

/// Delete and re-insert every child record of the survey
async fn replace_children(conn: &mut PgConnection, survey: &Survey) -> DbResult<()> {
    let identifier = survey.survey_identifier;

    sqlx::query("DELETE FROM observations WHERE survey_identifier = $1")
        .bind(identifier)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM disturbances WHERE survey_identifier = $1")
        .bind(identifier)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM survey_observers WHERE survey_identifier = $1")
        .bind(identifier)
        .execute(&mut *conn)
        .await?;

    for observation in &survey.observations {
        sqlx::query(
            "INSERT INTO observations (survey_identifier, bird_species_id, bin1, bin2, \
             feeding_success_rate, habitat_type_id, primary_activity_id, secondary_activity_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(identifier)
        .bind(observation.bird_species_id)
        .bind(observation.bin1)
        .bind(observation.bin2)
        .bind(observation.feeding_success_rate)
        .bind(observation.habitat_type_id)
        .bind(observation.primary_activity_id)
        .bind(observation.secondary_activity_id)
        .execute(&mut *conn)
        .await?;
    }

    for disturbance in &survey.disturbances {
        sqlx::query(
            "INSERT INTO disturbances (survey_identifier, disturbance_type_id, quantity, \
             duration_minutes, result) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(identifier)
        .bind(disturbance.disturbance_type_id)
        .bind(disturbance.quantity)
        .bind(disturbance.duration_minutes)
        .bind(&disturbance.result)
        .execute(&mut *conn)
        .await?;
    }

    for observer in &survey.observers {
        sqlx::query(
            "INSERT INTO survey_observers (survey_identifier, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(identifier)
        .bind(observer)
        .execute(&mut *conn)
        .await?;
    }

    tracing::debug!(
        survey_identifier = %identifier,
        observations = survey.observations.len(),
        disturbances = survey.disturbances.len(),
        observers = survey.observers.len(),
        "Replaced survey children"
    );

    Ok(())
}

#[async_trait]
impl SurveyPersistence for PgSurveyPersistence {
    #[tracing::instrument(skip(self))]
    async fn find_pending(&self, identifier: Uuid) -> DbResult<Option<Survey>> {
        self.find_in(SurveyState::Pending, identifier).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_completed(&self, identifier: Uuid) -> DbResult<Option<Survey>> {
        self.find_in(SurveyState::Completed, identifier).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_submitter(&self, user_id: i32) -> DbResult<Vec<Survey>> {
        let mut surveys = self.find_submitted_in(SurveyState::Pending, user_id).await?;
        surveys.extend(self.find_submitted_in(SurveyState::Completed, user_id).await?);
        surveys.sort_by(submitter_order);
        Ok(surveys)
    }

    #[tracing::instrument(skip(self, survey), fields(survey_identifier = %survey.survey_identifier))]
    async fn insert_pending(&self, survey: &Survey) -> DbResult<Survey> {
        let mut tx = self.pool.begin().await?;

        let id = insert_row(&mut tx, SurveyState::Pending, survey).await?;
        replace_children(&mut tx, survey).await?;

        tx.commit().await?;

        tracing::info!(id, "Pending survey created");

        Ok(Survey {
            id,
            state: SurveyState::Pending,
            ..survey.clone()
        })
    }

    #[tracing::instrument(skip(self, survey), fields(survey_identifier = %survey.survey_identifier))]
    async fn update_pending(&self, survey: &Survey) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        if !update_row(&mut tx, SurveyState::Pending, survey).await? {
            return Ok(false);
        }
        replace_children(&mut tx, survey).await?;

        tx.commit().await?;
        Ok(true)
    }

    #[tracing::instrument(skip(self, survey), fields(survey_identifier = %survey.survey_identifier))]
    async fn promote_to_completed(&self, survey: &Survey) -> DbResult<Survey> {
        let mut tx = self.pool.begin().await?;

        let id = insert_row(&mut tx, SurveyState::Completed, survey).await?;
        sqlx::query("DELETE FROM surveys_pending WHERE survey_identifier = $1")
            .bind(survey.survey_identifier)
            .execute(&mut *tx)
            .await?;
        replace_children(&mut tx, survey).await?;

        tx.commit().await?;

        tracing::info!(id, "Survey promoted to completed");

        Ok(Survey {
            id,
            state: SurveyState::Completed,
            ..survey.clone()
        })
    }

    #[tracing::instrument(skip(self, survey), fields(survey_identifier = %survey.survey_identifier))]
    async fn update_completed(&self, survey: &Survey) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        if !update_row(&mut tx, SurveyState::Completed, survey).await? {
            return Ok(false);
        }
        replace_children(&mut tx, survey).await?;

        tx.commit().await?;
        Ok(true)
    }
}
