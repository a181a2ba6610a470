//! SeaORM entity definitions.
//!
//! The schema is generated from these definitions at startup, so foreign
//! keys and unique constraints are declared here rather than in SQL.

pub mod comment;
pub mod milestone;
pub mod permission;
pub mod project;
pub mod role;
pub mod role_permission;
pub mod status;
pub mod test_case;
pub mod test_plan;
pub mod test_run;
pub mod test_run_case;
pub mod test_suite;
pub mod user;
