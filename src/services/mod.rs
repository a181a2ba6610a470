//! Business logic services.

pub mod bootstrap;
pub mod mail;
pub mod onboarding;
pub mod password;
pub mod seed;

pub use bootstrap::{BootstrapReport, bootstrap, prepare};
pub use mail::{MailSender, MemoryMailSender, SmtpMailSender};
