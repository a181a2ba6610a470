//! Domain error types for the test case manager.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use std::path::PathBuf;

use crate::services::mail::MailError;
use crate::services::password::PasswordError;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unique constraint would be violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Outgoing mail could not be delivered
    #[error("Mail delivery failed: {0}")]
    Mail(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
            AppError::Unauthorized(_) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            AppError::Conflict(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "CONFLICT",
                self.to_string(),
            ),
            AppError::Mail(err_str) => {
                tracing::error!("Mail error: {}", err_str);
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "MAIL_ERROR",
                    "The notification email could not be sent".to_string(),
                )
            }
        };

        let mut builder = HttpResponse::build(status);
        if matches!(self, AppError::Unauthorized(_)) {
            builder.insert_header((
                actix_web::http::header::WWW_AUTHENTICATE,
                "Basic realm=\"tcm\"",
            ));
        }

        builder.json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return AppError::Conflict(detail);
        }
        AppError::Database(err.to_string())
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::Mail(err.to_string())
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Database(format!("Password hashing failed: {}", err))
    }
}

/// Startup failures.
///
/// Only [`BootstrapError::DatabaseUnavailable`] is worth retrying from the
/// outside (e.g. by a supervisor restarting the process later).
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database unreachable after {attempts} attempt(s): {source}")]
    DatabaseUnavailable {
        attempts: u32,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Schema migration failed: {0}")]
    Migration(#[source] sea_orm::DbErr),

    #[error("Database error during seeding: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Failed to hash the temporary password: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("Failed to create the initial user: {0}")]
    SeedUser(#[source] sea_orm::DbErr),

    #[error("Failed to send the onboarding email to {recipient}: {source}")]
    Notification {
        recipient: String,
        #[source]
        source: MailError,
    },

    #[error("Failed to read status file {}: {source}", path.display())]
    StatusFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse status file {}: {source}", path.display())]
    StatusParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BootstrapError {
    /// Whether trying again later may succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DatabaseUnavailable { .. })
    }

    /// Process exit code for this failure (`EX_TEMPFAIL` when retryable).
    pub fn exit_code(&self) -> i32 {
        if self.is_retryable() { 75 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::NotFound("Project x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (AppError::Conflict("dup".into()), StatusCode::CONFLICT),
            (AppError::Mail("smtp down".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            assert_eq!(err.error_response().status(), expected, "{}", err);
        }
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let resp = AppError::Unauthorized("Missing credentials".into()).error_response();
        assert!(
            resp.headers()
                .contains_key(actix_web::http::header::WWW_AUTHENTICATE)
        );
    }

    #[test]
    fn test_bootstrap_retryability() {
        let unavailable = BootstrapError::DatabaseUnavailable {
            attempts: 10,
            source: sea_orm::DbErr::Custom("connection refused".into()),
        };
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.exit_code(), 75);

        let migration = BootstrapError::Migration(sea_orm::DbErr::Custom("bad".into()));
        assert!(!migration.is_retryable());
        assert_eq!(migration.exit_code(), 1);
    }
}
