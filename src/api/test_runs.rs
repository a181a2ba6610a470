//! Test run API handlers: runs, their scheduled cases, and comments.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::api::members::check_user;
use crate::api::statuses::check_status;
use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::db::test_runs::NewTestRun;
use crate::error::{AppError, AppResult};
use crate::models::{
    CommentResponse, CreateCommentRequest, CreateTestRunRequest, DeletedResponse,
    TestRunCaseResponse, TestRunDetailResponse, TestRunResponse, UpdateTestRunCaseRequest,
    UpdateTestRunRequest, optional_text, require_text,
};

/// Drop repeated IDs, keeping first occurrences in order.
fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/runs",
    tag = "Test Runs",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Runs of the project, newest first", body = Vec<TestRunResponse>),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_test_runs(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    let runs: Vec<TestRunResponse> = pool
        .list_test_runs(project.id)
        .await?
        .into_iter()
        .map(TestRunResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(runs))
}

/// Create a run and schedule the given test cases in it.
///
/// Every case must belong to a suite of the same project.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/runs",
    tag = "Test Runs",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    request_body = CreateTestRunRequest,
    responses(
        (status = 201, description = "Run created", body = TestRunDetailResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_test_run(
    auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateTestRunRequest>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    let req = body.into_inner();
    let name = require_text("Name", &req.name)?;

    if let Some(plan_id) = req.test_plan_id {
        let plan = pool
            .get_test_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown test plan {}", plan_id)))?;
        if plan.project_id != project.id {
            return Err(AppError::InvalidInput(format!(
                "Test plan {} belongs to another project",
                plan_id
            )));
        }
    }
    check_user(&pool, req.assignee_id).await?;

    let case_ids = dedup_ids(req.case_ids);
    let found = pool.count_project_test_cases(project.id, &case_ids).await?;
    if found != case_ids.len() as u64 {
        return Err(AppError::InvalidInput(format!(
            "{} of {} test case(s) do not exist in this project",
            case_ids.len() as u64 - found,
            case_ids.len()
        )));
    }

    let (run, cases) = pool
        .insert_test_run(
            NewTestRun {
                project_id: project.id,
                test_plan_id: req.test_plan_id,
                name,
                description: optional_text(req.description.as_deref()),
                assignee_id: req.assignee_id,
            },
            &case_ids,
        )
        .await?;

    info!(
        run_id = %run.id,
        cases = cases.len(),
        created_by = %auth.user.id,
        "Created test run {}",
        run.name
    );

    Ok(HttpResponse::Created().json(TestRunDetailResponse {
        run: TestRunResponse::from(run),
        cases: cases.into_iter().map(TestRunCaseResponse::from).collect(),
    }))
}

/// Get a run with its scheduled cases.
#[utoipa::path(
    get,
    path = "/api/v1/runs/{id}",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Run ID")),
    responses(
        (status = 200, description = "Run", body = TestRunDetailResponse),
        (status = 404, description = "Run not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn get_test_run(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let run = pool
        .get_test_run(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test run {}", id)))?;
    let cases = pool.list_test_run_cases(run.id).await?;

    Ok(HttpResponse::Ok().json(TestRunDetailResponse {
        run: TestRunResponse::from(run),
        cases: cases.into_iter().map(TestRunCaseResponse::from).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/runs/{id}",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Run ID")),
    request_body = UpdateTestRunRequest,
    responses(
        (status = 200, description = "Run updated", body = TestRunResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Run not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_test_run(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestRunRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    check_user(&pool, req.assignee_id).await?;

    let changes = UpdateTestRunRequest {
        name: req.name.as_deref().map(|n| require_text("Name", n)).transpose()?,
        description: optional_text(req.description.as_deref()),
        assignee_id: req.assignee_id,
    };

    let run = pool.update_test_run(path.into_inner(), changes).await?;
    Ok(HttpResponse::Ok().json(TestRunResponse::from(run)))
}

/// Delete a run with its scheduled cases and their comments.
#[utoipa::path(
    delete,
    path = "/api/v1/runs/{id}",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Run ID")),
    responses(
        (status = 200, description = "Run deleted", body = DeletedResponse),
        (status = 404, description = "Run not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_test_run(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_test_run(id).await? {
        return Err(AppError::NotFound(format!("Test run {}", id)));
    }

    info!(run_id = %id, "Deleted test run");
    Ok(HttpResponse::Ok().json(DeletedResponse::new("Test run", id)))
}

#[utoipa::path(
    get,
    path = "/api/v1/runs/{id}/cases",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Run ID")),
    responses(
        (status = 200, description = "Scheduled cases", body = Vec<TestRunCaseResponse>),
        (status = 404, description = "Run not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_test_run_cases(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if pool.get_test_run(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Test run {}", id)));
    }

    let cases: Vec<TestRunCaseResponse> = pool
        .list_test_run_cases(id)
        .await?
        .into_iter()
        .map(TestRunCaseResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(cases))
}

/// Record a result on a scheduled case.
#[utoipa::path(
    put,
    path = "/api/v1/run-cases/{id}",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Run case ID")),
    request_body = UpdateTestRunCaseRequest,
    responses(
        (status = 200, description = "Run case updated", body = TestRunCaseResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Run case not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_test_run_case(
    auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestRunCaseRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    check_status(&pool, req.status_id).await?;
    check_user(&pool, req.assignee_id).await?;

    let case = pool
        .update_test_run_case(id, req.status_id, req.assignee_id)
        .await?;
    info!(run_case_id = %id, updated_by = %auth.user.id, "Updated run case");

    Ok(HttpResponse::Ok().json(TestRunCaseResponse::from(case)))
}

#[utoipa::path(
    get,
    path = "/api/v1/run-cases/{id}/comments",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Run case ID")),
    responses(
        (status = 200, description = "Comments, oldest first", body = Vec<CommentResponse>),
        (status = 404, description = "Run case not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_comments(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if pool.get_test_run_case(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Run case {}", id)));
    }

    let comments: Vec<CommentResponse> = pool
        .list_comments(id)
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// Comment on a scheduled case as the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/run-cases/{id}/comments",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Run case ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Empty comment", body = crate::error::ErrorResponse),
        (status = 404, description = "Run case not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_comment(
    auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let content = require_text("Content", &body.content)?;
    if pool.get_test_run_case(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Run case {}", id)));
    }

    let comment = pool.insert_comment(id, auth.user.id, content).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/runs")
            .route(web::get().to(list_test_runs))
            .route(web::post().to(create_test_run)),
    )
    .service(
        web::resource("/runs/{id}")
            .route(web::get().to(get_test_run))
            .route(web::put().to(update_test_run))
            .route(web::delete().to(delete_test_run)),
    )
    .service(web::resource("/runs/{id}/cases").route(web::get().to(list_test_run_cases)))
    .service(web::resource("/run-cases/{id}").route(web::put().to(update_test_run_case)))
    .service(
        web::resource("/run-cases/{id}/comments")
            .route(web::get().to(list_comments))
            .route(web::post().to(create_comment)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_ids_keeps_first_occurrence() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        assert_eq!(dedup_ids(vec![a, b, a, b, a]), vec![a, b]);
        assert!(dedup_ids(Vec::new()).is_empty());
    }
}
