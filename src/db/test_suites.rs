//! Database queries for test suites.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::test_suite::{self, ActiveModel, Entity as TestSuite};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Insert a test suite into a project.
    pub async fn insert_test_suite(
        &self,
        project_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> AppResult<test_suite::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(project_id),
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test suite: {}", e)))
    }

    /// List the suites of a project by name.
    pub async fn list_test_suites(&self, project_id: Uuid) -> AppResult<Vec<test_suite::Model>> {
        TestSuite::find()
            .filter(test_suite::Column::ProjectId.eq(project_id))
            .order_by_asc(test_suite::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test suites: {}", e)))
    }

    pub async fn get_test_suite(&self, id: Uuid) -> AppResult<Option<test_suite::Model>> {
        TestSuite::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test suite: {}", e)))
    }

    /// Get a suite or fail with NotFound.
    pub async fn require_test_suite(&self, id: Uuid) -> AppResult<test_suite::Model> {
        self.get_test_suite(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test suite {}", id)))
    }

    pub async fn update_test_suite(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<test_suite::Model> {
        let suite = self.require_test_suite(id).await?;

        let mut active: ActiveModel = suite.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test suite: {}", e)))
    }

    pub async fn delete_test_suite(&self, id: Uuid) -> AppResult<bool> {
        let result = TestSuite::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test suite: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
