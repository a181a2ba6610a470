//! First-boot seed data: the initial administrator and the status list.
//!
//! Both seeds only act on an empty table. Nothing guards two instances
//! seeding the same empty database at once; the unique email and status
//! name constraints make the slower instance fail instead of duplicating.

use std::path::Path;

use sea_orm::{EntityTrait, PaginatorTrait, TransactionTrait};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::InitialUserSettings;
use crate::db::DbPool;
use crate::db::statuses::insert_statuses;
use crate::entity::{status, user};
use crate::error::BootstrapError;
use crate::models::CreateStatusRequest;
use crate::services::mail::MailSender;
use crate::services::onboarding::{self, DEFAULT_LANGUAGE, NewMember, OnboardingError};

/// Result of a seeding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(Uuid),
    Skipped,
}

/// Create the initial user if the user table is empty.
pub async fn seed_initial_user(
    pool: &DbPool,
    settings: &InitialUserSettings,
    mailer: &dyn MailSender,
) -> Result<SeedOutcome, BootstrapError> {
    let existing = user::Entity::find().count(pool.connection()).await?;
    if existing > 0 {
        info!("{} user(s) present, skipping initial user", existing);
        return Ok(SeedOutcome::Skipped);
    }

    let member = NewMember {
        name: settings.name.clone(),
        email: settings.email.clone(),
        language: DEFAULT_LANGUAGE.to_string(),
        role_id: None,
    };

    let user = onboarding::onboard_user(pool, mailer, member)
        .await
        .map_err(|e| match e {
            OnboardingError::Password(e) => BootstrapError::PasswordHash(e),
            OnboardingError::Create(e) => BootstrapError::SeedUser(e),
            OnboardingError::Notify { recipient, source } => {
                BootstrapError::Notification { recipient, source }
            }
            OnboardingError::Transaction(e) => BootstrapError::Database(e),
        })?;

    info!(user_id = %user.id, "Initial user created and notified");
    Ok(SeedOutcome::Created(user.id))
}

/// Read and parse a status list file.
pub async fn load_status_file(path: &Path) -> Result<Vec<CreateStatusRequest>, BootstrapError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| BootstrapError::StatusFile {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&raw).map_err(|source| BootstrapError::StatusParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Insert the statuses from `path` if the status table is empty.
///
/// All rows go in one transaction. Returns the number of rows inserted.
pub async fn seed_initial_statuses(pool: &DbPool, path: &Path) -> Result<usize, BootstrapError> {
    let existing = status::Entity::find().count(pool.connection()).await?;
    if existing > 0 {
        info!("{} status(es) present, skipping initial statuses", existing);
        return Ok(0);
    }

    let display_path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    info!("Seeding statuses from {}", display_path.display());

    let definitions = load_status_file(path).await?;
    if definitions.is_empty() {
        warn!("{} contains no statuses", display_path.display());
        return Ok(0);
    }

    let txn = pool.connection().begin().await?;
    let inserted = insert_statuses(&txn, definitions).await?;
    txn.commit().await?;

    info!("Seeded {} status(es)", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mail::MemoryMailSender;
    use crate::services::password::verify_password;
    use std::io::Write;

    async fn test_pool() -> DbPool {
        let pool = DbPool::connect("sqlite::memory:").await.unwrap();
        pool.run_migrations().await.unwrap();
        pool
    }

    fn initial_user() -> InitialUserSettings {
        InitialUserSettings {
            name: "Ada".to_string(),
            email: "Ada@Example.com".to_string(),
        }
    }

    fn status_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_seed_user_on_empty_table() {
        let pool = test_pool().await;
        let mailer = MemoryMailSender::new();

        let outcome = seed_initial_user(&pool, &initial_user(), &mailer)
            .await
            .unwrap();
        let SeedOutcome::Created(id) = outcome else {
            panic!("expected a user to be created");
        };

        let user = pool.get_user(id).await.unwrap().unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.status, "Active");
        assert_eq!(user.language, "en");

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["ada@example.com".to_string()]);
        assert_eq!(sent[0].subject, "Your Account");

        let temp_password = sent[0]
            .body
            .strip_prefix("Welcome Ada Your Password is ")
            .unwrap();
        assert_eq!(temp_password.len(), 10);
        assert_ne!(user.password, temp_password);
        assert!(verify_password(temp_password, &user.password));
    }

    #[tokio::test]
    async fn test_seed_user_skipped_when_users_exist() {
        let pool = test_pool().await;
        let first = MemoryMailSender::new();
        seed_initial_user(&pool, &initial_user(), &first).await.unwrap();

        let second = MemoryMailSender::new();
        let outcome = seed_initial_user(&pool, &initial_user(), &second)
            .await
            .unwrap();

        assert_eq!(outcome, SeedOutcome::Skipped);
        assert!(second.sent().is_empty());
        assert_eq!(pool.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed_user_rolls_back_when_mail_fails() {
        let pool = test_pool().await;
        let mailer = MemoryMailSender::failing("relay down");

        let result = seed_initial_user(&pool, &initial_user(), &mailer).await;

        assert!(matches!(result, Err(BootstrapError::Notification { .. })));
        assert_eq!(pool.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_statuses_inserts_each_entry_once() {
        let pool = test_pool().await;
        let file = status_file(
            r##"[{"name": "Untested"}, {"name": "Passed", "color": "#2e7d32"}, {"name": "Failed"}]"##,
        );

        assert_eq!(seed_initial_statuses(&pool, file.path()).await.unwrap(), 3);
        assert_eq!(seed_initial_statuses(&pool, file.path()).await.unwrap(), 0);

        let statuses = pool.list_statuses().await.unwrap();
        let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"Passed"));
    }

    #[tokio::test]
    async fn test_seed_statuses_malformed_file() {
        let pool = test_pool().await;
        let file = status_file(r#"[{"name": "Untested"}, {"colour": 5}"#);

        let result = seed_initial_statuses(&pool, file.path()).await;

        assert!(matches!(result, Err(BootstrapError::StatusParse { .. })));
        assert_eq!(pool.count_statuses().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_statuses_missing_file() {
        let pool = test_pool().await;

        let result = seed_initial_statuses(&pool, Path::new("does/not/exist.json")).await;

        assert!(matches!(result, Err(BootstrapError::StatusFile { .. })));
    }

    #[tokio::test]
    async fn test_seed_statuses_duplicate_names_insert_nothing() {
        let pool = test_pool().await;
        let file = status_file(r#"[{"name": "Passed"}, {"name": "Passed"}]"#);

        let result = seed_initial_statuses(&pool, file.path()).await;

        assert!(matches!(result, Err(BootstrapError::Database(_))));
        assert_eq!(pool.count_statuses().await.unwrap(), 0);
    }
}
