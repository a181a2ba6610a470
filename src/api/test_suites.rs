//! Test suite API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTestSuiteRequest, DeletedResponse, TestSuiteResponse, UpdateTestSuiteRequest,
    optional_text, require_text,
};

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/suites",
    tag = "Test Suites",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Suites of the project", body = Vec<TestSuiteResponse>),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_test_suites(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    let suites: Vec<TestSuiteResponse> = pool
        .list_test_suites(project.id)
        .await?
        .into_iter()
        .map(TestSuiteResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(suites))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/suites",
    tag = "Test Suites",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    request_body = CreateTestSuiteRequest,
    responses(
        (status = 201, description = "Suite created", body = TestSuiteResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_test_suite(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateTestSuiteRequest>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    let req = body.into_inner();

    let suite = pool
        .insert_test_suite(
            project.id,
            require_text("Name", &req.name)?,
            optional_text(req.description.as_deref()),
        )
        .await?;

    Ok(HttpResponse::Created().json(TestSuiteResponse::from(suite)))
}

#[utoipa::path(
    get,
    path = "/api/v1/suites/{id}",
    tag = "Test Suites",
    params(("id" = Uuid, Path, description = "Suite ID")),
    responses(
        (status = 200, description = "Suite", body = TestSuiteResponse),
        (status = 404, description = "Suite not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn get_test_suite(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let suite = pool.require_test_suite(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TestSuiteResponse::from(suite)))
}

#[utoipa::path(
    put,
    path = "/api/v1/suites/{id}",
    tag = "Test Suites",
    params(("id" = Uuid, Path, description = "Suite ID")),
    request_body = UpdateTestSuiteRequest,
    responses(
        (status = 200, description = "Suite updated", body = TestSuiteResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Suite not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_test_suite(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestSuiteRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let name = req.name.as_deref().map(|n| require_text("Name", n)).transpose()?;

    let suite = pool
        .update_test_suite(
            path.into_inner(),
            name,
            optional_text(req.description.as_deref()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(TestSuiteResponse::from(suite)))
}

/// Delete a suite and its test cases.
#[utoipa::path(
    delete,
    path = "/api/v1/suites/{id}",
    tag = "Test Suites",
    params(("id" = Uuid, Path, description = "Suite ID")),
    responses(
        (status = 200, description = "Suite deleted", body = DeletedResponse),
        (status = 404, description = "Suite not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_test_suite(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_test_suite(id).await? {
        return Err(AppError::NotFound(format!("Test suite {}", id)));
    }

    Ok(HttpResponse::Ok().json(DeletedResponse::new("Test suite", id)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/suites")
            .route(web::get().to(list_test_suites))
            .route(web::post().to(create_test_suite)),
    )
    .service(
        web::resource("/suites/{id}")
            .route(web::get().to(get_test_suite))
            .route(web::put().to(update_test_suite))
            .route(web::delete().to(delete_test_suite)),
    );
}
