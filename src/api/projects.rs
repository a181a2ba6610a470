//! Project API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateProjectRequest, DeletedResponse, ProjectResponse, UpdateProjectRequest, optional_text,
    require_text,
};

/// List projects.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projects, newest first", body = Vec<ProjectResponse>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_projects(_auth: BasicAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let projects: Vec<ProjectResponse> = pool
        .list_projects()
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(projects))
}

/// Create a project.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_project(
    auth: BasicAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let name = require_text("Name", &req.name)?;

    let project = pool
        .insert_project(name, optional_text(req.description.as_deref()))
        .await?;
    info!(project_id = %project.id, created_by = %auth.user.id, "Created project {}", project.name);

    Ok(HttpResponse::Created().json(ProjectResponse::from(project)))
}

/// Get a project.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn get_project(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let project = pool.require_project(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProjectResponse::from(project)))
}

/// Update a project.
#[utoipa::path(
    put,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_project(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProjectRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let name = req.name.as_deref().map(|n| require_text("Name", n)).transpose()?;

    let project = pool
        .update_project(
            path.into_inner(),
            name,
            optional_text(req.description.as_deref()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ProjectResponse::from(project)))
}

/// Delete a project with all its milestones, suites, plans and runs.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = DeletedResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_project(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_project(id).await? {
        return Err(AppError::NotFound(format!("Project {}", id)));
    }

    info!(project_id = %id, "Deleted project");
    Ok(HttpResponse::Ok().json(DeletedResponse::new("Project", id)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(list_projects))
            .route(web::post().to(create_project)),
    )
    .service(
        web::resource("/projects/{id}")
            .route(web::get().to(get_project))
            .route(web::put().to(update_project))
            .route(web::delete().to(delete_project)),
    );
}
