//! Generic PostgreSQL CRUD set
//!
//! Any entity whose row is a flat list of columns gets [`PersistenceBase`]
//! by implementing [`PgRecord`]. SQL text is assembled from the column list
//! once per call; values are always bound, never interpolated.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use super::persistence::PersistenceBase;
use super::DbResult;
use crate::models::{Entity, Location, WorkType};

/// Column layout of a flat entity table
pub trait PgRecord: Entity + for<'r> FromRow<'r, PgRow> + Unpin {
    /// Columns other than `id`, in bind order
    const COLUMNS: &'static [&'static str];

    /// Bind the values of [`Self::COLUMNS`] in order
    fn bind_columns<'q, O>(
        &'q self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments>;
}

impl PgRecord for WorkType {
    const COLUMNS: &'static [&'static str] = &["description"];

    fn bind_columns<'q, O>(
        &'q self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        query.bind(&self.description)
    }
}

impl PgRecord for Location {
    const COLUMNS: &'static [&'static str] = &["site_name", "site_code", "latitude", "longitude"];

    fn bind_columns<'q, O>(
        &'q self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        query
            .bind(&self.site_name)
            .bind(&self.site_code)
            .bind(self.latitude)
            .bind(self.longitude)
    }
}

pub struct PgCrudSet<T> {
    pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> PgCrudSet<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<T> Clone for PgCrudSet<T> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

fn select_list<T: PgRecord>() -> String {
    format!("id, {}", T::COLUMNS.join(", "))
}

fn insert_sql<T: PgRecord>() -> String {
    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders.join(", "),
        select_list::<T>()
    )
}

fn update_sql<T: PgRecord>() -> String {
    let assignments: Vec<String> = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING id",
        T::TABLE,
        assignments.join(", "),
        T::COLUMNS.len() + 1
    )
}

#[async_trait]
impl<T: PgRecord> PersistenceBase<T> for PgCrudSet<T> {
    #[tracing::instrument(skip(self), fields(table = T::TABLE))]
    async fn find_all(&self) -> DbResult<Vec<T>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", select_list::<T>(), T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(table = T::TABLE))]
    async fn find_by_id(&self, id: i32) -> DbResult<Option<T>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", select_list::<T>(), T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, entity), fields(table = T::TABLE))]
    async fn insert(&self, entity: &T) -> DbResult<T> {
        let sql = insert_sql::<T>();
        let row = entity
            .bind_columns(sqlx::query_as::<_, T>(&sql))
            .fetch_one(&self.pool)
            .await?;
        tracing::debug!(id = row.id(), "Inserted row");
        Ok(row)
    }

    #[tracing::instrument(skip(self, entity), fields(table = T::TABLE, id = entity.id()))]
    async fn update(&self, entity: &T) -> DbResult<bool> {
        let sql = update_sql::<T>();
        let updated = entity
            .bind_columns(sqlx::query_as::<_, (i32,)>(&sql))
            .bind(entity.id())
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql() {
        assert_eq!(
            insert_sql::<WorkType>(),
            "INSERT INTO work_types (description) VALUES ($1) RETURNING id, description"
        );
    }

    #[test]
    fn test_update_sql_binds_id_last() {
        assert_eq!(
            update_sql::<Location>(),
            "UPDATE locations SET site_name = $1, site_code = $2, latitude = $3, longitude = $4 \
             WHERE id = $5 RETURNING id"
        );
    }
}
