//! Server integration suite.
//!
//! Boots the full stack against in-memory SQLite with a recording mail
//! sender; no external services are needed.
//!
//! Run with: cargo test --test server

mod test_helpers;

mod test_auth;
mod test_bootstrap;
mod test_members;
mod test_projects;
mod test_runs;
mod test_statuses;
