//! Startup sequence: retries, migration and seeding.

use std::time::Duration;

use tcm_lib::error::BootstrapError;
use tcm_lib::services::seed::SeedOutcome;
use tcm_lib::services::{self, MemoryMailSender};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_first_boot_seeds_user_and_statuses() {
    let statuses = status_file(STATUSES_JSON);
    let config = test_config(statuses.path());
    let mailer = MemoryMailSender::new();

    let (pool, report) = services::bootstrap(&config, &mailer).await.unwrap();

    assert!(matches!(report.initial_user, SeedOutcome::Created(_)));
    assert_eq!(report.statuses_seeded, 3);
    assert_eq!(pool.count_users().await.unwrap(), 1);
    assert_eq!(pool.count_statuses().await.unwrap(), 3);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec![ADMIN_EMAIL.to_string()]);
    assert_eq!(sent[0].subject, "Your Account");
    assert!(sent[0].body.starts_with(WELCOME_PREFIX));
}

#[actix_rt::test]
async fn test_second_prepare_is_a_no_op() {
    let statuses = status_file(STATUSES_JSON);
    let config = test_config(statuses.path());
    let first = MemoryMailSender::new();
    let (pool, _) = services::bootstrap(&config, &first).await.unwrap();

    let second = MemoryMailSender::new();
    let report = services::prepare(&pool, &config, &second).await.unwrap();

    assert_eq!(report.initial_user, SeedOutcome::Skipped);
    assert_eq!(report.statuses_seeded, 0);
    assert!(second.sent().is_empty());
    assert_eq!(pool.count_users().await.unwrap(), 1);
    assert_eq!(pool.count_statuses().await.unwrap(), 3);
}

#[actix_rt::test]
async fn test_mail_failure_aborts_without_user() {
    let statuses = status_file(STATUSES_JSON);
    let config = test_config(statuses.path());
    let pool = tcm_lib::db::DbPool::connect("sqlite::memory:").await.unwrap();
    let mailer = MemoryMailSender::failing("connection refused");

    let err = services::prepare(&pool, &config, &mailer).await.unwrap_err();

    assert!(matches!(err, BootstrapError::Notification { .. }));
    assert!(!err.is_retryable());
    assert_eq!(err.exit_code(), 1);
    assert_eq!(pool.count_users().await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_malformed_status_file_aborts() {
    let statuses = status_file("{ not json");
    let config = test_config(statuses.path());
    let pool = tcm_lib::db::DbPool::connect("sqlite::memory:").await.unwrap();
    let mailer = MemoryMailSender::new();

    let err = services::prepare(&pool, &config, &mailer).await.unwrap_err();

    assert!(matches!(err, BootstrapError::StatusParse { .. }));
    assert_eq!(pool.count_statuses().await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_unreachable_database_is_retryable() {
    let statuses = status_file(STATUSES_JSON);
    let mut config = test_config(statuses.path());
    config.database.url = Some("sqlite:///no/such/dir/tcm.db?mode=ro".to_string());
    config.database.connect_attempts = 2;
    config.database.connect_interval = Duration::from_millis(1);
    let mailer = MemoryMailSender::new();

    let err = services::bootstrap(&config, &mailer).await.unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::DatabaseUnavailable { attempts: 2, .. }
    ));
    assert_eq!(err.exit_code(), 75);
    assert!(mailer.sent().is_empty());
}
