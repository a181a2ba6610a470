//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DB_USER: &str = "tcm";
    pub const DEV_DB_PASSWORD: &str = "tcm";
    pub const DEV_DB_HOST: &str = "localhost";
    pub const DEV_DB_NAME: &str = "tcm";
    pub const DB_PORT: u16 = 3306;
    pub const DB_CONNECT_ATTEMPTS: u32 = 10;
    pub const DB_CONNECT_INTERVAL_SECS: u64 = 5;

    pub const DEV_MAIL_HOST: &str = "localhost";
    pub const DEV_MAIL_PORT: u16 = 1025;
    pub const DEV_MAIL_USERNAME: &str = "noreply@localhost";

    pub const DEV_INITIAL_USER_NAME: &str = "Admin";
    pub const DEV_INITIAL_USER_EMAIL: &str = "admin@localhost";

    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8000;
    pub const INITIAL_STATUSES_PATH: &str = "config/initial_statuses.json";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Full connection URL; overrides the individual fields when set
    pub url: Option<String>,
    pub user: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Maximum number of connection attempts at startup
    pub connect_attempts: u32,
    /// Fixed wait between connection attempts
    pub connect_interval: Duration,
}

impl DatabaseSettings {
    /// Build the connection URL handed to SeaORM.
    ///
    /// User and password are percent-encoded so reserved characters survive.
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "mysql://{}:{}@{}:{}/{}",
                urlencoding::encode(&self.user),
                urlencoding::encode(self.password.expose_secret()),
                self.host,
                self.port,
                self.name
            ),
        }
    }

    /// Connection target without credentials, safe to log.
    pub fn display_target(&self) -> String {
        match &self.url {
            Some(url) => match url.split_once('@') {
                Some((_, rest)) => rest.to_string(),
                None => url.clone(),
            },
            None => format!("{}:{}/{}", self.host, self.port, self.name),
        }
    }
}

/// Outgoing mail (SMTP) settings.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Sender address; defaults to the SMTP username
    pub from: String,
    /// Use STARTTLS when talking to the relay
    pub use_tls: bool,
}

/// Identity of the account created on first boot.
#[derive(Debug, Clone)]
pub struct InitialUserSettings {
    pub name: String,
    pub email: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    pub database: DatabaseSettings,
    pub mail: MailSettings,
    pub initial_user: InitialUserSettings,
    /// JSON file with the statuses inserted on first boot
    pub initial_statuses_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: development/production (default: development)
    /// - `TCM_HOST` / `TCM_PORT`: listen address (default: 0.0.0.0:8000)
    /// - `DATABASE_URL`: full connection URL (optional, overrides `DB_*`)
    /// - `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_NAME`, `DB_PORT` (default 3306)
    /// - `DB_CONNECT_ATTEMPTS` (default 10), `DB_CONNECT_INTERVAL_SECS` (default 5)
    /// - `MAIL_HOST`, `MAIL_PORT`, `MAIL_USERNAME`, `MAIL_PASSWORD`
    /// - `MAIL_FROM` (default: `MAIL_USERNAME`), `MAIL_USE_TLS` (default: false)
    /// - `INITIAL_USER_NAME`, `INITIAL_USER_EMAIL`
    /// - `INITIAL_STATUSES_PATH` (default: config/initial_statuses.json)
    ///
    /// In production every development default is rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("RUST_ENV") {
            Some(s) => Environment::parse(&s).ok_or(ConfigError::InvalidValue(
                "RUST_ENV must be 'development' or 'production'",
            ))?,
            None => Environment::Development,
        };

        let host = lookup("TCM_HOST").unwrap_or_else(|| defaults::HOST.to_string());
        let port = parse_or(
            &lookup,
            "TCM_PORT",
            defaults::PORT,
            "TCM_PORT must be a valid port number",
        )?;

        let database = DatabaseSettings {
            url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            user: lookup("DB_USER").unwrap_or_else(|| defaults::DEV_DB_USER.to_string()),
            password: SecretString::from(
                lookup("DB_PASSWORD").unwrap_or_else(|| defaults::DEV_DB_PASSWORD.to_string()),
            ),
            host: lookup("DB_HOST").unwrap_or_else(|| defaults::DEV_DB_HOST.to_string()),
            port: parse_or(
                &lookup,
                "DB_PORT",
                defaults::DB_PORT,
                "DB_PORT must be a valid port number",
            )?,
            name: lookup("DB_NAME").unwrap_or_else(|| defaults::DEV_DB_NAME.to_string()),
            connect_attempts: parse_or(
                &lookup,
                "DB_CONNECT_ATTEMPTS",
                defaults::DB_CONNECT_ATTEMPTS,
                "DB_CONNECT_ATTEMPTS must be a valid number",
            )?,
            connect_interval: Duration::from_secs(parse_or(
                &lookup,
                "DB_CONNECT_INTERVAL_SECS",
                defaults::DB_CONNECT_INTERVAL_SECS,
                "DB_CONNECT_INTERVAL_SECS must be a valid number",
            )?),
        };

        if database.connect_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_CONNECT_ATTEMPTS must be at least 1",
            ));
        }

        let mail_username =
            lookup("MAIL_USERNAME").unwrap_or_else(|| defaults::DEV_MAIL_USERNAME.to_string());
        let mail = MailSettings {
            host: lookup("MAIL_HOST").unwrap_or_else(|| defaults::DEV_MAIL_HOST.to_string()),
            port: parse_or(
                &lookup,
                "MAIL_PORT",
                defaults::DEV_MAIL_PORT,
                "MAIL_PORT must be a valid port number",
            )?,
            from: lookup("MAIL_FROM").unwrap_or_else(|| mail_username.clone()),
            username: mail_username,
            password: SecretString::from(lookup("MAIL_PASSWORD").unwrap_or_default()),
            use_tls: match lookup("MAIL_USE_TLS") {
                Some(v) => parse_bool(&v)
                    .ok_or(ConfigError::InvalidValue("MAIL_USE_TLS must be true or false"))?,
                None => false,
            },
        };

        let initial_user = InitialUserSettings {
            name: lookup("INITIAL_USER_NAME")
                .unwrap_or_else(|| defaults::DEV_INITIAL_USER_NAME.to_string()),
            email: lookup("INITIAL_USER_EMAIL")
                .unwrap_or_else(|| defaults::DEV_INITIAL_USER_EMAIL.to_string()),
        };

        let initial_statuses_path = lookup("INITIAL_STATUSES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::INITIAL_STATUSES_PATH));

        let config = Config {
            environment,
            host,
            port,
            database,
            mail,
            initial_user,
            initial_statuses_path,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.url.is_none() {
            if self.database.password.expose_secret() == defaults::DEV_DB_PASSWORD
                || self.database.password.expose_secret().is_empty()
            {
                errors.push(
                    "DB_PASSWORD is empty or using the development default. Set a production password."
                        .to_string(),
                );
            }
            if self.database.host == defaults::DEV_DB_HOST {
                errors.push(format!(
                    "DB_HOST is using development default '{}'.",
                    defaults::DEV_DB_HOST
                ));
            }
        }

        if self.mail.host == defaults::DEV_MAIL_HOST {
            errors.push(format!(
                "MAIL_HOST is using development default '{}'.",
                defaults::DEV_MAIL_HOST
            ));
        }

        if self.initial_user.email == defaults::DEV_INITIAL_USER_EMAIL {
            errors.push(
                "INITIAL_USER_EMAIL is using the development default. Set the administrator's address."
                    .to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T, msg: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue(msg)),
        None => Ok(default),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
