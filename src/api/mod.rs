//! API endpoint modules.

pub mod auth;
pub mod health;
pub mod members;
pub mod milestones;
pub mod openapi;
pub mod projects;
pub mod statuses;
pub mod test_cases;
pub mod test_plans;
pub mod test_runs;
pub mod test_suites;

use actix_web::web;

use crate::error::AppError;

pub use openapi::ApiDoc;

/// JSON body config that reports malformed bodies as `INVALID_INPUT`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

/// Register every `/api/v1` route on a scope or app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes)
        .configure(statuses::configure_routes)
        .configure(members::configure_routes)
        .configure(projects::configure_routes)
        .configure(milestones::configure_routes)
        .configure(test_suites::configure_routes)
        .configure(test_cases::configure_routes)
        .configure(test_plans::configure_routes)
        .configure(test_runs::configure_routes);
}
