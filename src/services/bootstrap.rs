//! Startup sequence: connect, migrate, seed.

use tracing::{info, warn};

use crate::config::Config;
use crate::db::DbPool;
use crate::error::BootstrapError;
use crate::services::mail::MailSender;
use crate::services::seed::{self, SeedOutcome};

/// What the seeding steps did on this boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub initial_user: SeedOutcome,
    pub statuses_seeded: usize,
}

/// Connect to the database (with retries), then run [`prepare`].
pub async fn bootstrap(
    config: &Config,
    mailer: &dyn MailSender,
) -> Result<(DbPool, BootstrapReport), BootstrapError> {
    let pool = DbPool::connect_with_retry(&config.database).await?;
    info!("Database connection established");

    let report = prepare(&pool, config, mailer).await?;
    Ok((pool, report))
}

/// Migrate the schema and seed first-boot data on an open pool.
pub async fn prepare(
    pool: &DbPool,
    config: &Config,
    mailer: &dyn MailSender,
) -> Result<BootstrapReport, BootstrapError> {
    pool.run_migrations()
        .await
        .map_err(BootstrapError::Migration)?;
    info!("Database migrations complete");

    if sends_plain_mail_in_production(config) {
        warn!(
            "Outgoing mail to {}:{} is not encrypted (MAIL_USE_TLS=false)",
            config.mail.host, config.mail.port
        );
    }

    let initial_user = seed::seed_initial_user(pool, &config.initial_user, mailer).await?;
    let statuses_seeded = seed::seed_initial_statuses(pool, &config.initial_statuses_path).await?;

    Ok(BootstrapReport {
        initial_user,
        statuses_seeded,
    })
}

/// True when a production deployment talks to its SMTP relay without TLS.
fn sends_plain_mail_in_production(config: &Config) -> bool {
    config.environment.is_production() && !config.mail.use_tls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn config(environment: Environment, use_tls: bool) -> Config {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.environment = environment;
        config.mail.use_tls = use_tls;
        config
    }

    #[test]
    fn test_plain_mail_flagged_only_in_production() {
        assert!(sends_plain_mail_in_production(&config(
            Environment::Production,
            false
        )));
        assert!(!sends_plain_mail_in_production(&config(
            Environment::Production,
            true
        )));
        assert!(!sends_plain_mail_in_production(&config(
            Environment::Development,
            false
        )));
    }
}
