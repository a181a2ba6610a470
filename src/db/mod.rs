//! Database module providing connection management, migrations, and queries.

pub mod milestones;
pub mod migrations;
pub mod projects;
pub mod statuses;
pub mod test_cases;
pub mod test_plans;
pub mod test_runs;
pub mod test_suites;
pub mod users;

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseSettings;
use crate::error::BootstrapError;

/// Fixed-interval retry policy: no backoff growth, no jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &DatabaseSettings) -> Self {
        Self {
            max_attempts: settings.connect_attempts,
            interval: settings.connect_interval,
        }
    }
}

/// Returned when every attempt of [`retry_fixed`] failed.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `op` until it succeeds or `policy.max_attempts` attempts have failed.
///
/// The attempt number (starting at 1) is passed to `op`. Attempts are spaced
/// by `policy.interval`; there is no wait after the final attempt.
pub async fn retry_fixed<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %e,
                    "Attempt failed, retrying in {:?}",
                    policy.interval
                );
                tokio::time::sleep(policy.interval).await;
                attempt += 1;
            }
        }
    }
}

/// Database connection pool wrapper.
#[derive(Clone, Debug)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Open a pool for the given URL (single attempt).
    ///
    /// In-memory SQLite is pinned to one connection so every query sees the
    /// same database.
    pub async fn connect(url: &str) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(url);
        opt.sqlx_logging(false);
        if url.starts_with("sqlite:") && url.contains(":memory:") {
            opt.max_connections(1).min_connections(1);
        }

        let conn = Database::connect(opt).await?;
        Ok(Self { conn })
    }

    /// Open a pool, retrying with the fixed policy from settings.
    pub async fn connect_with_retry(settings: &DatabaseSettings) -> Result<Self, BootstrapError> {
        let policy = RetryPolicy::from_settings(settings);
        let url = settings.connection_url();
        let url = url.as_str();
        info!(
            "Connecting to database at {} (up to {} attempts)",
            settings.display_target(),
            policy.max_attempts
        );

        retry_fixed(&policy, |_| Self::connect(url))
            .await
            .map_err(|e| BootstrapError::DatabaseUnavailable {
                attempts: e.attempts,
                source: e.last_error,
            })
    }

    /// Get access to the underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}
