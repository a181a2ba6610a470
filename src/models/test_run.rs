//! Test run, run case and comment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{comment, test_run, test_run_case};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestRunResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub test_plan_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_run::Model> for TestRunResponse {
    fn from(m: test_run::Model) -> Self {
        Self {
            id: m.id,
            project_id: m.project_id,
            test_plan_id: m.test_plan_id,
            name: m.name,
            description: m.description,
            assignee_id: m.assignee_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A run together with its scheduled cases.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestRunDetailResponse {
    #[serde(flatten)]
    pub run: TestRunResponse,
    pub cases: Vec<TestRunCaseResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestRunRequest {
    pub name: String,
    pub description: Option<String>,
    pub test_plan_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    /// Test cases to schedule in the run
    #[serde(default)]
    pub case_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestRunRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestRunCaseResponse {
    pub id: Uuid,
    pub test_run_id: Uuid,
    pub test_case_id: Uuid,
    pub status_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_run_case::Model> for TestRunCaseResponse {
    fn from(m: test_run_case::Model) -> Self {
        Self {
            id: m.id,
            test_run_id: m.test_run_id,
            test_case_id: m.test_case_id,
            status_id: m.status_id,
            assignee_id: m.assignee_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestRunCaseRequest {
    pub status_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub test_run_case_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(m: comment::Model) -> Self {
        Self {
            id: m.id,
            test_run_case_id: m.test_run_case_id,
            user_id: m.user_id,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
}
