use serde::{Deserialize, Serialize};

use crate::models::WorkType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkTypeModel {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub description: String,
}

impl From<WorkType> for WorkTypeModel {
    fn from(entity: WorkType) -> Self {
        Self {
            id: entity.id,
            description: entity.description,
        }
    }
}

impl From<WorkTypeModel> for WorkType {
    fn from(model: WorkTypeModel) -> Self {
        Self {
            id: model.id,
            description: model.description,
        }
    }
}
