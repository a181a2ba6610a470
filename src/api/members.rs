//! Member management: invite, list, edit, remove.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::db::users::UserChanges;
use crate::error::{AppError, AppResult};
use crate::models::{
    DeletedResponse, InviteMemberRequest, UpdateMemberRequest, UserResponse, UserStatus,
    require_text,
};
use crate::services::mail::MailSender;
use crate::services::onboarding::{self, DEFAULT_LANGUAGE, NewMember};

/// Fail with InvalidInput unless `user_id` is absent or names a stored user.
pub(crate) async fn check_user(pool: &DbPool, user_id: Option<Uuid>) -> AppResult<()> {
    if let Some(id) = user_id
        && pool.get_user(id).await?.is_none()
    {
        return Err(AppError::InvalidInput(format!("Unknown user {}", id)));
    }
    Ok(())
}

async fn check_role(pool: &DbPool, role_id: Option<Uuid>) -> AppResult<()> {
    if let Some(id) = role_id
        && pool.get_role(id).await?.is_none()
    {
        return Err(AppError::InvalidInput(format!("Unknown role {}", id)));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<String> {
    let email = require_text("Email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::InvalidInput(format!(
            "'{}' is not an email address",
            email
        ))),
    }
}

/// List members.
#[utoipa::path(
    get,
    path = "/api/v1/members",
    tag = "Members",
    responses(
        (status = 200, description = "Members ordered by name", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn list_members(_auth: BasicAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let members: Vec<UserResponse> = pool
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(members))
}

/// Invite a member.
///
/// Creates an active account and emails it a temporary password. If the
/// mail cannot be sent the account is not created.
#[utoipa::path(
    post,
    path = "/api/v1/members",
    tag = "Members",
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "Member invited", body = UserResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse),
        (status = 502, description = "Invitation mail could not be sent", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn invite_member(
    auth: BasicAuth,
    pool: web::Data<DbPool>,
    mailer: web::Data<dyn MailSender>,
    body: web::Json<InviteMemberRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let member = NewMember {
        name: require_text("Name", &req.name)?,
        email: validate_email(&req.email)?,
        language: req
            .language
            .as_deref()
            .map(|l| require_text("Language", l))
            .transpose()?
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        role_id: req.role_id,
    };
    check_role(&pool, member.role_id).await?;

    if pool.find_user_by_email(&member.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A member with email {} already exists",
            member.email
        )));
    }

    let user = onboarding::onboard_user(&pool, mailer.get_ref(), member).await?;
    info!(user_id = %user.id, invited_by = %auth.user.id, "Member invited");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Get a member.
#[utoipa::path(
    get,
    path = "/api/v1/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Member", body = UserResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn get_member(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = pool
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Update a member's profile or status.
#[utoipa::path(
    put,
    path = "/api/v1/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn update_member(
    _auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateMemberRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let status = req
        .status
        .as_deref()
        .map(|s| {
            UserStatus::parse(s).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Invalid status '{}'. Must be one of: Active, Inactive, Pending",
                    s
                ))
            })
        })
        .transpose()?;
    check_role(&pool, req.role_id).await?;

    let changes = UserChanges {
        name: req.name.as_deref().map(|n| require_text("Name", n)).transpose()?,
        status,
        language: req
            .language
            .as_deref()
            .map(|l| require_text("Language", l))
            .transpose()?,
        role_id: req.role_id,
    };

    let user = pool.update_user(id, changes).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Remove a member. Members cannot remove themselves.
#[utoipa::path(
    delete,
    path = "/api/v1/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Member removed", body = DeletedResponse),
        (status = 400, description = "Attempt to remove own account", body = crate::error::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_member(
    auth: BasicAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if id == auth.user.id {
        return Err(AppError::InvalidInput(
            "You cannot remove your own account".to_string(),
        ));
    }
    if !pool.delete_user(id).await? {
        return Err(AppError::NotFound(format!("User {}", id)));
    }

    info!(user_id = %id, removed_by = %auth.user.id, "Member removed");
    Ok(HttpResponse::Ok().json(DeletedResponse::new("User", id)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/members")
            .route(web::get().to(list_members))
            .route(web::post().to(invite_member)),
    )
    .service(
        web::resource("/members/{id}")
            .route(web::get().to(get_member))
            .route(web::put().to(update_member))
            .route(web::delete().to(delete_member)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" a@b.io ").unwrap(), "a@b.io");
        assert!(validate_email("nobody").is_err());
        assert!(validate_email("@b.io").is_err());
        assert!(validate_email("a@").is_err());
    }
}
