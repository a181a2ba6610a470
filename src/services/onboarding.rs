//! Account creation with an emailed temporary password.
//!
//! The user row is inserted inside a transaction that is committed only once
//! the onboarding mail has been accepted, so a failed notification never
//! leaves behind an account nobody knows the password of.

use sea_orm::{DbErr, TransactionTrait};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::db::users::{NewUser, insert_user};
use crate::entity::user;
use crate::error::AppError;
use crate::models::UserStatus;
use crate::services::mail::{MailError, MailSender};
use crate::services::password::{self, PasswordError, TEMP_PASSWORD_LENGTH};

/// Subject of the onboarding mail.
pub const ACCOUNT_MAIL_SUBJECT: &str = "Your Account";

/// Default language for new accounts.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Body of the onboarding mail.
pub fn account_mail_body(name: &str, temp_password: &str) -> String {
    format!("Welcome {} Your Password is {}", name, temp_password)
}

/// Identity of an account to create.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub language: String,
    pub role_id: Option<Uuid>,
}

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Failed to create user: {0}")]
    Create(#[source] DbErr),

    #[error("Failed to send onboarding email to {recipient}: {source}")]
    Notify {
        recipient: String,
        #[source]
        source: MailError,
    },

    #[error("Transaction failed: {0}")]
    Transaction(#[source] DbErr),
}

impl From<OnboardingError> for AppError {
    fn from(err: OnboardingError) -> Self {
        match err {
            OnboardingError::Password(e) => e.into(),
            OnboardingError::Create(e) => e.into(),
            OnboardingError::Notify { source, .. } => source.into(),
            OnboardingError::Transaction(e) => e.into(),
        }
    }
}

/// Create an "Active" user with a random temporary password and mail it.
pub async fn onboard_user(
    pool: &DbPool,
    mailer: &dyn MailSender,
    member: NewMember,
) -> Result<user::Model, OnboardingError> {
    let temp_password = password::generate_temp_password(TEMP_PASSWORD_LENGTH);
    let password_hash = password::hash_password(&temp_password)?;
    let email = member.email.trim().to_lowercase();

    let txn = pool
        .connection()
        .begin()
        .await
        .map_err(OnboardingError::Transaction)?;

    let user = insert_user(
        &txn,
        NewUser {
            name: member.name,
            email: email.clone(),
            password_hash,
            status: UserStatus::Active,
            language: member.language,
            role_id: member.role_id,
        },
    )
    .await
    .map_err(OnboardingError::Create)?;

    let body = account_mail_body(&user.name, &temp_password);
    if let Err(source) = mailer
        .send_mail(&[email.clone()], ACCOUNT_MAIL_SUBJECT, &body)
        .await
    {
        if let Err(e) = txn.rollback().await {
            warn!("Rollback after failed onboarding mail also failed: {}", e);
        }
        return Err(OnboardingError::Notify {
            recipient: email,
            source,
        });
    }

    txn.commit().await.map_err(OnboardingError::Transaction)?;

    info!(user_id = %user.id, "Onboarded user {}", user.email);
    Ok(user)
}
