//! Test case manager server library.
//!
//! Database bootstrap and seeding, mail delivery, and the HTTP API for
//! projects, suites, cases, plans and runs.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
