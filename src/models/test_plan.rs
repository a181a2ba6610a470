//! Test plan models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_plan;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestPlanResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub milestone_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_plan::Model> for TestPlanResponse {
    fn from(m: test_plan::Model) -> Self {
        Self {
            id: m.id,
            project_id: m.project_id,
            milestone_id: m.milestone_id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestPlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub milestone_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestPlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub milestone_id: Option<Uuid>,
}
