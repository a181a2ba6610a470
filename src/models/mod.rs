//! Request and response models for the HTTP API.

pub mod milestone;
pub mod project;
pub mod status;
pub mod test_case;
pub mod test_plan;
pub mod test_run;
pub mod test_suite;
pub mod user;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use milestone::{CreateMilestoneRequest, MilestoneResponse, UpdateMilestoneRequest};
pub use project::{CreateProjectRequest, ProjectResponse, UpdateProjectRequest};
pub use status::{CreateStatusRequest, StatusResponse, UpdateStatusRequest};
pub use test_case::{
    CreateTestCaseRequest, TestCaseFields, TestCaseResponse, UpdateTestCaseRequest,
};
pub use test_plan::{CreateTestPlanRequest, TestPlanResponse, UpdateTestPlanRequest};
pub use test_run::{
    CommentResponse, CreateCommentRequest, CreateTestRunRequest, TestRunCaseResponse,
    TestRunDetailResponse, TestRunResponse, UpdateTestRunCaseRequest, UpdateTestRunRequest,
};
pub use test_suite::{CreateTestSuiteRequest, TestSuiteResponse, UpdateTestSuiteRequest};
pub use user::{
    ChangePasswordRequest, InviteMemberRequest, LoginRequest, UpdateMemberRequest, UserResponse,
    UserStatus,
};

/// Body returned by DELETE endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub message: String,
    pub id: Uuid,
}

impl DeletedResponse {
    pub fn new(what: &str, id: Uuid) -> Self {
        Self {
            message: format!("{} deleted", what),
            id,
        }
    }
}

/// Trim a required text field, rejecting blank values.
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("Name", "  Smoke  ").unwrap(), "Smoke");
        assert!(matches!(
            require_text("Name", "   "),
            Err(AppError::InvalidInput(msg)) if msg == "Name is required"
        ));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some(" x ")), Some("x".to_string()));
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(None), None);
    }
}
