//! Migration: Create every table from the entity definitions.
//!
//! Tables are listed in dependency order so that foreign keys always point
//! at an existing table. `IF NOT EXISTS` keeps the migration safe against a
//! database that was created before migrations were tracked.

use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entity::{
    comment, milestone, permission, project, role, role_permission, status, test_case, test_plan,
    test_run, test_run_case, test_suite, user,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn create<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    stmt
}

/// CREATE TABLE statements in dependency order.
pub fn create_statements(schema: &Schema) -> Vec<TableCreateStatement> {
    vec![
        create(schema, status::Entity),
        create(schema, permission::Entity),
        create(schema, role::Entity),
        create(schema, role_permission::Entity),
        create(schema, user::Entity),
        create(schema, project::Entity),
        create(schema, milestone::Entity),
        create(schema, test_suite::Entity),
        create(schema, test_case::Entity),
        create(schema, test_plan::Entity),
        create(schema, test_run::Entity),
        create(schema, test_run_case::Entity),
        create(schema, comment::Entity),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        for stmt in create_statements(&schema) {
            manager.create_table(stmt).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order
        let tables: [&str; 13] = [
            "comments",
            "test_run_cases",
            "test_runs",
            "test_plans",
            "test_cases",
            "test_suites",
            "milestones",
            "projects",
            "users",
            "role_permissions",
            "roles",
            "permissions",
            "statuses",
        ];

        for table in tables {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}
