use std::sync::Arc;

use async_trait::async_trait;
use flightnode_common::validation::Validate;
use flightnode_common::{FlightNodeError, Result};

use crate::db::PersistenceBase;
use crate::models::WorkType;

/// Domain operations on work types
#[async_trait]
pub trait WorkTypeDomainManager: Send + Sync {
    async fn find_all(&self) -> Result<Vec<WorkType>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<WorkType>>;

    /// Validate and store; returns the entity with its assigned id
    async fn create(&self, work_type: WorkType) -> Result<WorkType>;

    async fn update(&self, work_type: WorkType) -> Result<()>;
}

pub struct WorkTypeManager {
    persistence: Arc<dyn PersistenceBase<WorkType>>,
}

impl WorkTypeManager {
    pub fn new(persistence: Arc<dyn PersistenceBase<WorkType>>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl WorkTypeDomainManager for WorkTypeManager {
    async fn find_all(&self) -> Result<Vec<WorkType>> {
        Ok(self.persistence.find_all().await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<WorkType>> {
        Ok(self.persistence.find_by_id(id).await?)
    }

    #[tracing::instrument(skip(self, work_type), fields(description = %work_type.description))]
    async fn create(&self, work_type: WorkType) -> Result<WorkType> {
        work_type.validate()?;
        let stored = self.persistence.insert(&work_type).await?;
        tracing::info!(id = stored.id, "Work type created");
        Ok(stored)
    }

    #[tracing::instrument(skip(self, work_type), fields(id = work_type.id))]
    async fn update(&self, work_type: WorkType) -> Result<()> {
        work_type.validate()?;
        if !self.persistence.update(&work_type).await? {
            return Err(FlightNodeError::user(format!(
                "work type {} does not exist",
                work_type.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryCrudSet;

    fn manager_with(rows: Vec<WorkType>) -> WorkTypeManager {
        WorkTypeManager::new(Arc::new(MemoryCrudSet::with_rows(rows)))
    }

    fn work_type(id: i32, description: &str) -> WorkType {
        WorkType {
            id,
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let manager = manager_with(vec![work_type(1, "Survey")]);
        let created = manager.create(work_type(0, "Outreach")).await.unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(manager.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_description() {
        let manager = manager_with(vec![]);
        let result = manager.create(work_type(0, "")).await;
        assert!(matches!(result, Err(FlightNodeError::Validation(_))));
        assert!(manager.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_existing() {
        let manager = manager_with(vec![work_type(1, "Survey")]);
        manager.update(work_type(1, "Field survey")).await.unwrap();

        let found = manager.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.description, "Field survey");
    }

    #[tokio::test]
    async fn test_update_missing_is_user_error() {
        let manager = manager_with(vec![]);
        match manager.update(work_type(42, "Survey")).await {
            Err(FlightNodeError::User(message)) => {
                assert_eq!(message, "work type 42 does not exist");
            },
            other => panic!("expected user error, got {:?}", other),
        }
    }
}
