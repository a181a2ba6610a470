//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Test Case Manager Server",
        version = "0.1.0",
        description = "API server for managing projects, test suites, test cases, plans and runs"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth endpoints
        api::auth::login,
        api::auth::me,
        api::auth::change_password,
        // Status endpoints
        api::statuses::list_statuses,
        api::statuses::create_status,
        api::statuses::update_status,
        api::statuses::delete_status,
        // Member endpoints
        api::members::list_members,
        api::members::invite_member,
        api::members::get_member,
        api::members::update_member,
        api::members::delete_member,
        // Project endpoints
        api::projects::list_projects,
        api::projects::create_project,
        api::projects::get_project,
        api::projects::update_project,
        api::projects::delete_project,
        // Milestone endpoints
        api::milestones::list_milestones,
        api::milestones::create_milestone,
        api::milestones::get_milestone,
        api::milestones::update_milestone,
        api::milestones::delete_milestone,
        // Test suite endpoints
        api::test_suites::list_test_suites,
        api::test_suites::create_test_suite,
        api::test_suites::get_test_suite,
        api::test_suites::update_test_suite,
        api::test_suites::delete_test_suite,
        // Test case endpoints
        api::test_cases::list_test_cases,
        api::test_cases::create_test_case,
        api::test_cases::get_test_case,
        api::test_cases::update_test_case,
        api::test_cases::delete_test_case,
        // Test plan endpoints
        api::test_plans::list_test_plans,
        api::test_plans::create_test_plan,
        api::test_plans::get_test_plan,
        api::test_plans::update_test_plan,
        api::test_plans::delete_test_plan,
        // Test run endpoints
        api::test_runs::list_test_runs,
        api::test_runs::create_test_run,
        api::test_runs::get_test_run,
        api::test_runs::update_test_run,
        api::test_runs::delete_test_run,
        api::test_runs::list_test_run_cases,
        api::test_runs::update_test_run_case,
        api::test_runs::list_comments,
        api::test_runs::create_comment,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::DeletedResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Auth and members
            api::auth::MessageResponse,
            models::UserStatus,
            models::UserResponse,
            models::LoginRequest,
            models::ChangePasswordRequest,
            models::InviteMemberRequest,
            models::UpdateMemberRequest,
            // Statuses
            models::StatusResponse,
            models::CreateStatusRequest,
            models::UpdateStatusRequest,
            // Projects and milestones
            models::ProjectResponse,
            models::CreateProjectRequest,
            models::UpdateProjectRequest,
            models::MilestoneResponse,
            models::CreateMilestoneRequest,
            models::UpdateMilestoneRequest,
            // Suites and cases
            models::TestSuiteResponse,
            models::CreateTestSuiteRequest,
            models::UpdateTestSuiteRequest,
            models::TestCaseFields,
            models::TestCaseResponse,
            models::CreateTestCaseRequest,
            models::UpdateTestCaseRequest,
            // Plans and runs
            models::TestPlanResponse,
            models::CreateTestPlanRequest,
            models::UpdateTestPlanRequest,
            models::TestRunResponse,
            models::TestRunDetailResponse,
            models::CreateTestRunRequest,
            models::UpdateTestRunRequest,
            models::TestRunCaseResponse,
            models::UpdateTestRunCaseRequest,
            models::CommentResponse,
            models::CreateCommentRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Credential check and password change"),
        (name = "Statuses", description = "Result statuses"),
        (name = "Members", description = "User accounts and invitations"),
        (name = "Projects", description = "Projects"),
        (name = "Milestones", description = "Project milestones"),
        (name = "Test Suites", description = "Suites grouping test cases"),
        (name = "Test Cases", description = "Test case definitions"),
        (name = "Test Plans", description = "Test plans"),
        (name = "Test Runs", description = "Runs, scheduled cases and comments")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add HTTP Basic security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Basic,
                    ),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes_and_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/projects/{project_id}/runs"));
        assert!(doc.paths.paths.contains_key("/api/v1/run-cases/{id}/comments"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("basic_auth"));
    }
}
