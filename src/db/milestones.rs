//! Database queries for milestones.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::milestone::{self, ActiveModel, Entity as Milestone};
use crate::error::{AppError, AppResult};
use crate::models::UpdateMilestoneRequest;

use super::DbPool;

impl DbPool {
    /// Insert a milestone into a project.
    pub async fn insert_milestone(
        &self,
        project_id: Uuid,
        name: String,
        description: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> AppResult<milestone::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(project_id),
            name: Set(name),
            description: Set(description),
            due_date: Set(due_date),
            completed: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert milestone: {}", e)))
    }

    /// List milestones of a project ordered by due date.
    pub async fn list_milestones(&self, project_id: Uuid) -> AppResult<Vec<milestone::Model>> {
        Milestone::find()
            .filter(milestone::Column::ProjectId.eq(project_id))
            .order_by_asc(milestone::Column::DueDate)
            .order_by_asc(milestone::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list milestones: {}", e)))
    }

    pub async fn get_milestone(&self, id: Uuid) -> AppResult<Option<milestone::Model>> {
        Milestone::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get milestone: {}", e)))
    }

    /// Update a milestone.
    pub async fn update_milestone(
        &self,
        id: Uuid,
        changes: UpdateMilestoneRequest,
    ) -> AppResult<milestone::Model> {
        let milestone = self
            .get_milestone(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Milestone {}", id)))?;

        let mut active: ActiveModel = milestone.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(due_date) = changes.due_date {
            active.due_date = Set(Some(due_date));
        }
        if let Some(completed) = changes.completed {
            active.completed = Set(completed);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update milestone: {}", e)))
    }

    pub async fn delete_milestone(&self, id: Uuid) -> AppResult<bool> {
        let result = Milestone::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete milestone: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
