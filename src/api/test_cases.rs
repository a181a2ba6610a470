//! Test case API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::api::statuses::check_status;
use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTestCaseRequest, DeletedResponse, TestCaseFields, TestCaseResponse,
    UpdateTestCaseRequest, optional_text, require_text,
};

/// Trim free-text fields and check the status reference.
async fn clean_fields(pool: &DbPool, fields: TestCaseFields) -> AppResult<TestCaseFields> {
    check_status(pool, fields.status_id).await?;

    Ok(TestCaseFields {
        preconditions: optional_text(fields.preconditions.as_deref()),
        steps: optional_text(fields.steps.as_deref()),
        expected_result: optional_text(fields.expected_result.as_deref()),
        priority: optional_text(fields.priority.as_deref()),
        status_id: fields.status_id,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/suites/{suite_id}/cases",
    tag = "Test Cases",
    params(("suite_id" = Uuid, Path, description = "Suite ID")),
    responses(
        (status = 200, description = "Cases of the suite", body = Vec<TestCaseResponse>),
        (status = 404, description = "Suite not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_test_cases(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let suite = pool.require_test_suite(path.into_inner()).await?;
    let cases: Vec<TestCaseResponse> = pool
        .list_test_cases(suite.id)
        .await?
        .into_iter()
        .map(TestCaseResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(cases))
}

#[utoipa::path(
    post,
    path = "/api/v1/suites/{suite_id}/cases",
    tag = "Test Cases",
    params(("suite_id" = Uuid, Path, description = "Suite ID")),
    request_body = CreateTestCaseRequest,
    responses(
        (status = 201, description = "Case created", body = TestCaseResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Suite not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_test_case(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let suite = pool.require_test_suite(path.into_inner()).await?;
    let req = body.into_inner();
    let title = require_text("Title", &req.title)?;
    let fields = clean_fields(&pool, req.fields).await?;

    let case = pool.insert_test_case(suite.id, title, fields).await?;
    Ok(HttpResponse::Created().json(TestCaseResponse::from(case)))
}

#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}",
    tag = "Test Cases",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case", body = TestCaseResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn get_test_case(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let case = pool
        .get_test_case(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test case {}", id)))?;

    Ok(HttpResponse::Ok().json(TestCaseResponse::from(case)))
}

#[utoipa::path(
    put,
    path = "/api/v1/cases/{id}",
    tag = "Test Cases",
    params(("id" = Uuid, Path, description = "Case ID")),
    request_body = UpdateTestCaseRequest,
    responses(
        (status = 200, description = "Case updated", body = TestCaseResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_test_case(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let title = req.title.as_deref().map(|t| require_text("Title", t)).transpose()?;
    let fields = clean_fields(&pool, req.fields).await?;

    let case = pool
        .update_test_case(path.into_inner(), title, fields)
        .await?;
    Ok(HttpResponse::Ok().json(TestCaseResponse::from(case)))
}

/// Delete a case. Runs that scheduled it lose that entry.
#[utoipa::path(
    delete,
    path = "/api/v1/cases/{id}",
    tag = "Test Cases",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case deleted", body = DeletedResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_test_case(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_test_case(id).await? {
        return Err(AppError::NotFound(format!("Test case {}", id)));
    }

    Ok(HttpResponse::Ok().json(DeletedResponse::new("Test case", id)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/suites/{suite_id}/cases")
            .route(web::get().to(list_test_cases))
            .route(web::post().to(create_test_case)),
    )
    .service(
        web::resource("/cases/{id}")
            .route(web::get().to(get_test_case))
            .route(web::put().to(update_test_case))
            .route(web::delete().to(delete_test_case)),
    );
}
