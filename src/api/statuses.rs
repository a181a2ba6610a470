//! Status API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateStatusRequest, DeletedResponse, StatusResponse, UpdateStatusRequest, optional_text,
    require_text,
};

/// Fail with InvalidInput unless `status_id` is absent or names a stored status.
pub(crate) async fn check_status(pool: &DbPool, status_id: Option<Uuid>) -> AppResult<()> {
    if let Some(id) = status_id
        && pool.get_status(id).await?.is_none()
    {
        return Err(AppError::InvalidInput(format!("Unknown status {}", id)));
    }
    Ok(())
}

/// List all statuses.
#[utoipa::path(
    get,
    path = "/api/v1/statuses",
    tag = "Statuses",
    responses(
        (status = 200, description = "Statuses in creation order", body = Vec<StatusResponse>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_statuses(_auth: BasicAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let statuses: Vec<StatusResponse> = pool
        .list_statuses()
        .await?
        .into_iter()
        .map(StatusResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(statuses))
}

/// Create a status.
#[utoipa::path(
    post,
    path = "/api/v1/statuses",
    tag = "Statuses",
    request_body = CreateStatusRequest,
    responses(
        (status = 201, description = "Status created", body = StatusResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 409, description = "Status name already exists", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn create_status(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateStatusRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let definition = CreateStatusRequest {
        name: require_text("Name", &req.name)?,
        color: optional_text(req.color.as_deref()),
    };

    let status = pool.insert_status(definition).await?;
    info!(status_id = %status.id, "Created status {}", status.name);

    Ok(HttpResponse::Created().json(StatusResponse::from(status)))
}

/// Rename or recolor a status.
#[utoipa::path(
    put,
    path = "/api/v1/statuses/{id}",
    tag = "Statuses",
    params(("id" = Uuid, Path, description = "Status ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Status not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Status name already exists", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_status(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let name = req.name.as_deref().map(|n| require_text("Name", n)).transpose()?;
    let status = pool
        .update_status(id, name, optional_text(req.color.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(StatusResponse::from(status)))
}

/// Delete a status.
///
/// Test cases and run cases that used it keep existing with no status.
#[utoipa::path(
    delete,
    path = "/api/v1/statuses/{id}",
    tag = "Statuses",
    params(("id" = Uuid, Path, description = "Status ID")),
    responses(
        (status = 200, description = "Status deleted", body = DeletedResponse),
        (status = 404, description = "Status not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_status(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_status(id).await? {
        return Err(AppError::NotFound(format!("Status {}", id)));
    }

    info!(status_id = %id, "Deleted status");
    Ok(HttpResponse::Ok().json(DeletedResponse::new("Status", id)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/statuses")
            .route(web::get().to(list_statuses))
            .route(web::post().to(create_status)),
    )
    .service(
        web::resource("/statuses/{id}")
            .route(web::put().to(update_status))
            .route(web::delete().to(delete_status)),
    );
}
