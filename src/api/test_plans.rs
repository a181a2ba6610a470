//! Test plan API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTestPlanRequest, DeletedResponse, TestPlanResponse, UpdateTestPlanRequest,
    optional_text, require_text,
};

/// A plan may only target a milestone of its own project.
async fn check_milestone(
    pool: &DbPool,
    project_id: Uuid,
    milestone_id: Option<Uuid>,
) -> AppResult<()> {
    let Some(id) = milestone_id else {
        return Ok(());
    };

    match pool.get_milestone(id).await? {
        Some(milestone) if milestone.project_id == project_id => Ok(()),
        Some(_) => Err(AppError::InvalidInput(format!(
            "Milestone {} belongs to another project",
            id
        ))),
        None => Err(AppError::InvalidInput(format!("Unknown milestone {}", id))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/plans",
    tag = "Test Plans",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Plans of the project", body = Vec<TestPlanResponse>),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_test_plans(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    let plans: Vec<TestPlanResponse> = pool
        .list_test_plans(project.id)
        .await?
        .into_iter()
        .map(TestPlanResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(plans))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/plans",
    tag = "Test Plans",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    request_body = CreateTestPlanRequest,
    responses(
        (status = 201, description = "Plan created", body = TestPlanResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_test_plan(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateTestPlanRequest>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    let req = body.into_inner();
    let name = require_text("Name", &req.name)?;
    check_milestone(&pool, project.id, req.milestone_id).await?;

    let plan = pool
        .insert_test_plan(
            project.id,
            req.milestone_id,
            name,
            optional_text(req.description.as_deref()),
        )
        .await?;

    Ok(HttpResponse::Created().json(TestPlanResponse::from(plan)))
}

#[utoipa::path(
    get,
    path = "/api/v1/plans/{id}",
    tag = "Test Plans",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan", body = TestPlanResponse),
        (status = 404, description = "Plan not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn get_test_plan(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let plan = pool
        .get_test_plan(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test plan {}", id)))?;

    Ok(HttpResponse::Ok().json(TestPlanResponse::from(plan)))
}

#[utoipa::path(
    put,
    path = "/api/v1/plans/{id}",
    tag = "Test Plans",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = UpdateTestPlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = TestPlanResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Plan not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_test_plan(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestPlanRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let plan = pool
        .get_test_plan(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test plan {}", id)))?;
    let name = req.name.as_deref().map(|n| require_text("Name", n)).transpose()?;
    check_milestone(&pool, plan.project_id, req.milestone_id).await?;

    let plan = pool
        .update_test_plan(
            id,
            name,
            optional_text(req.description.as_deref()),
            req.milestone_id,
        )
        .await?;

    Ok(HttpResponse::Ok().json(TestPlanResponse::from(plan)))
}

/// Delete a plan. Runs created from it keep existing unlinked.
#[utoipa::path(
    delete,
    path = "/api/v1/plans/{id}",
    tag = "Test Plans",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan deleted", body = DeletedResponse),
        (status = 404, description = "Plan not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_test_plan(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_test_plan(id).await? {
        return Err(AppError::NotFound(format!("Test plan {}", id)));
    }

    Ok(HttpResponse::Ok().json(DeletedResponse::new("Test plan", id)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/plans")
            .route(web::get().to(list_test_plans))
            .route(web::post().to(create_test_plan)),
    )
    .service(
        web::resource("/plans/{id}")
            .route(web::get().to(get_test_plan))
            .route(web::put().to(update_test_plan))
            .route(web::delete().to(delete_test_plan)),
    );
}
