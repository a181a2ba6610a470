//! Actix-web extractor for HTTP Basic authentication.
//!
//! The password from the header is wrapped in `SecretString` immediately and
//! is never logged.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use secrecy::ExposeSecret;
use tracing::debug;

use super::parse_basic_header;
use crate::db::DbPool;
use crate::entity::user;
use crate::error::AppError;
use crate::models::UserStatus;
use crate::services::password::verify_password;

/// Extractor that requires valid Basic credentials of an active user.
///
/// ```ignore
/// async fn protected_handler(auth: BasicAuth) -> impl Responder {
///     // auth.user is the authenticated account
/// }
/// ```
pub struct BasicAuth {
    pub user: user::Model,
}

fn rejected() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}

impl FromRequest for BasicAuth {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let credentials = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(parse_basic_header);

        Box::pin(async move {
            let pool = pool.ok_or_else(|| AppError::Database("Database pool not configured".to_string()))?;

            let credentials = match credentials {
                Some(Some(credentials)) => credentials,
                Some(None) => {
                    return Err(AppError::Unauthorized(
                        "Malformed Authorization header".to_string(),
                    ));
                }
                None => {
                    return Err(AppError::Unauthorized(
                        "Missing credentials. Provide an Authorization: Basic header.".to_string(),
                    ));
                }
            };

            let user = pool
                .find_user_by_email(&credentials.email)
                .await?
                .ok_or_else(rejected)?;

            if !verify_password(credentials.password.expose_secret(), &user.password) {
                debug!(user_id = %user.id, "Password mismatch");
                return Err(rejected());
            }

            if UserStatus::parse(&user.status) != Some(UserStatus::Active) {
                debug!(user_id = %user.id, status = %user.status, "Inactive account");
                return Err(AppError::Unauthorized("Account is not active".to_string()));
            }

            Ok(BasicAuth { user })
        })
    }
}
