//! Milestone API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateMilestoneRequest, DeletedResponse, MilestoneResponse, UpdateMilestoneRequest,
    optional_text, require_text,
};

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/milestones",
    tag = "Milestones",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Milestones of the project", body = Vec<MilestoneResponse>),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_milestones(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    let milestones: Vec<MilestoneResponse> = pool
        .list_milestones(project.id)
        .await?
        .into_iter()
        .map(MilestoneResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(milestones))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/milestones",
    tag = "Milestones",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    request_body = CreateMilestoneRequest,
    responses(
        (status = 201, description = "Milestone created", body = MilestoneResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_milestone(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateMilestoneRequest>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    let req = body.into_inner();

    let milestone = pool
        .insert_milestone(
            project.id,
            require_text("Name", &req.name)?,
            optional_text(req.description.as_deref()),
            req.due_date,
        )
        .await?;

    Ok(HttpResponse::Created().json(MilestoneResponse::from(milestone)))
}

#[utoipa::path(
    get,
    path = "/api/v1/milestones/{id}",
    tag = "Milestones",
    params(("id" = Uuid, Path, description = "Milestone ID")),
    responses(
        (status = 200, description = "Milestone", body = MilestoneResponse),
        (status = 404, description = "Milestone not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn get_milestone(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let milestone = pool
        .get_milestone(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Milestone {}", id)))?;

    Ok(HttpResponse::Ok().json(MilestoneResponse::from(milestone)))
}

/// Update a milestone, including marking it completed.
#[utoipa::path(
    put,
    path = "/api/v1/milestones/{id}",
    tag = "Milestones",
    params(("id" = Uuid, Path, description = "Milestone ID")),
    request_body = UpdateMilestoneRequest,
    responses(
        (status = 200, description = "Milestone updated", body = MilestoneResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Milestone not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_milestone(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateMilestoneRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = UpdateMilestoneRequest {
        name: req.name.as_deref().map(|n| require_text("Name", n)).transpose()?,
        description: optional_text(req.description.as_deref()),
        ..req
    };

    let milestone = pool.update_milestone(path.into_inner(), changes).await?;
    Ok(HttpResponse::Ok().json(MilestoneResponse::from(milestone)))
}

/// Delete a milestone. Plans that targeted it keep existing unlinked.
#[utoipa::path(
    delete,
    path = "/api/v1/milestones/{id}",
    tag = "Milestones",
    params(("id" = Uuid, Path, description = "Milestone ID")),
    responses(
        (status = 200, description = "Milestone deleted", body = DeletedResponse),
        (status = 404, description = "Milestone not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_milestone(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_milestone(id).await? {
        return Err(AppError::NotFound(format!("Milestone {}", id)));
    }

    Ok(HttpResponse::Ok().json(DeletedResponse::new("Milestone", id)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/milestones")
            .route(web::get().to(list_milestones))
            .route(web::post().to(create_milestone)),
    )
    .service(
        web::resource("/milestones/{id}")
            .route(web::get().to(get_milestone))
            .route(web::put().to(update_milestone))
            .route(web::delete().to(delete_milestone)),
    );
}
