//! Database queries for test plans.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::test_plan::{self, ActiveModel, Entity as TestPlan};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Insert a test plan into a project.
    pub async fn insert_test_plan(
        &self,
        project_id: Uuid,
        milestone_id: Option<Uuid>,
        name: String,
        description: Option<String>,
    ) -> AppResult<test_plan::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(project_id),
            milestone_id: Set(milestone_id),
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test plan: {}", e)))
    }

    pub async fn list_test_plans(&self, project_id: Uuid) -> AppResult<Vec<test_plan::Model>> {
        TestPlan::find()
            .filter(test_plan::Column::ProjectId.eq(project_id))
            .order_by_desc(test_plan::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test plans: {}", e)))
    }

    pub async fn get_test_plan(&self, id: Uuid) -> AppResult<Option<test_plan::Model>> {
        TestPlan::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test plan: {}", e)))
    }

    pub async fn update_test_plan(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        milestone_id: Option<Uuid>,
    ) -> AppResult<test_plan::Model> {
        let plan = self
            .get_test_plan(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test plan {}", id)))?;

        let mut active: ActiveModel = plan.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        if let Some(milestone_id) = milestone_id {
            active.milestone_id = Set(Some(milestone_id));
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test plan: {}", e)))
    }

    pub async fn delete_test_plan(&self, id: Uuid) -> AppResult<bool> {
        let result = TestPlan::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test plan: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
