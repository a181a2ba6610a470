//! Test case models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_case;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestCaseResponse {
    pub id: Uuid,
    pub test_suite_id: Uuid,
    pub title: String,
    pub preconditions: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub priority: Option<String>,
    pub status_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_case::Model> for TestCaseResponse {
    fn from(m: test_case::Model) -> Self {
        Self {
            id: m.id,
            test_suite_id: m.test_suite_id,
            title: m.title,
            preconditions: m.preconditions,
            steps: m.steps,
            expected_result: m.expected_result,
            priority: m.priority,
            status_id: m.status_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Fields shared by create and update; on update `None` keeps the stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TestCaseFields {
    pub preconditions: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub priority: Option<String>,
    pub status_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestCaseRequest {
    pub title: String,
    #[serde(flatten)]
    pub fields: TestCaseFields,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestCaseRequest {
    pub title: Option<String>,
    #[serde(flatten)]
    pub fields: TestCaseFields,
}
