//! Session-less account endpoints: credential check, profile, password change.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::BasicAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ChangePasswordRequest, LoginRequest, UserResponse, UserStatus};
use crate::services::password::{self, MIN_PASSWORD_LENGTH};

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Check an email/password pair.
///
/// There are no sessions; clients send the same pair as Basic credentials on
/// every other request.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials valid", body = UserResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
    )
)]
pub async fn login(
    pool: web::Data<DbPool>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = pool
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password) {
        warn!(user_id = %user.id, "Failed login");
        return Err(invalid());
    }
    if UserStatus::parse(&user.status) != Some(UserStatus::Active) {
        return Err(AppError::Unauthorized("Account is not active".to_string()));
    }

    info!(user_id = %user.id, "Login succeeded");
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// The authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn me(auth: BasicAuth) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(auth.user)))
}

/// Replace the caller's password.
#[utoipa::path(
    put,
    path = "/api/v1/auth/password",
    tag = "Auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "New password too short", body = crate::error::ErrorResponse),
        (status = 401, description = "Current password wrong", body = crate::error::ErrorResponse),
    ),
    security(("basic_auth" = []))
)]
pub async fn change_password(
    auth: BasicAuth,
    pool: web::Data<DbPool>,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if !password::verify_password(&req.current_password, &auth.user.password) {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }
    if req.new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "New password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let hash = password::hash_password(&req.new_password)?;
    pool.update_user_password(auth.user.id, hash).await?;
    info!(user_id = %auth.user.id, "Password changed");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password changed".to_string(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/login").route(web::post().to(login)))
        .service(web::resource("/auth/me").route(web::get().to(me)))
        .service(web::resource("/auth/password").route(web::put().to(change_password)));
}
