//! Database queries for test cases.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::test_case::{self, ActiveModel, Entity as TestCase};
use crate::entity::test_suite;
use crate::error::{AppError, AppResult};
use crate::models::TestCaseFields;

use super::DbPool;

impl DbPool {
    /// Insert a test case into a suite.
    pub async fn insert_test_case(
        &self,
        test_suite_id: Uuid,
        title: String,
        fields: TestCaseFields,
    ) -> AppResult<test_case::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            test_suite_id: Set(test_suite_id),
            title: Set(title),
            preconditions: Set(fields.preconditions),
            steps: Set(fields.steps),
            expected_result: Set(fields.expected_result),
            priority: Set(fields.priority),
            status_id: Set(fields.status_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))
    }

    /// List the cases of a suite in creation order.
    pub async fn list_test_cases(&self, test_suite_id: Uuid) -> AppResult<Vec<test_case::Model>> {
        TestCase::find()
            .filter(test_case::Column::TestSuiteId.eq(test_suite_id))
            .order_by_asc(test_case::Column::CreatedAt)
            .order_by_asc(test_case::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))
    }

    pub async fn get_test_case(&self, id: Uuid) -> AppResult<Option<test_case::Model>> {
        TestCase::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test case: {}", e)))
    }

    /// Count how many of `ids` are test cases belonging to `project_id`.
    pub async fn count_project_test_cases(&self, project_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        TestCase::find()
            .inner_join(test_suite::Entity)
            .filter(test_suite::Column::ProjectId.eq(project_id))
            .filter(test_case::Column::Id.is_in(ids.iter().copied()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test cases: {}", e)))
    }

    /// Update a test case; `None` fields keep their stored value.
    pub async fn update_test_case(
        &self,
        id: Uuid,
        title: Option<String>,
        fields: TestCaseFields,
    ) -> AppResult<test_case::Model> {
        let case = self
            .get_test_case(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test case {}", id)))?;

        let mut active: ActiveModel = case.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(preconditions) = fields.preconditions {
            active.preconditions = Set(Some(preconditions));
        }
        if let Some(steps) = fields.steps {
            active.steps = Set(Some(steps));
        }
        if let Some(expected_result) = fields.expected_result {
            active.expected_result = Set(Some(expected_result));
        }
        if let Some(priority) = fields.priority {
            active.priority = Set(Some(priority));
        }
        if let Some(status_id) = fields.status_id {
            active.status_id = Set(Some(status_id));
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test case: {}", e)))
    }

    pub async fn delete_test_case(&self, id: Uuid) -> AppResult<bool> {
        let result = TestCase::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test case: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
