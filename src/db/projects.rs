//! Database queries for projects.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::project::{self, ActiveModel, Entity as Project};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Insert a new project.
    pub async fn insert_project(
        &self,
        name: String,
        description: Option<String>,
    ) -> AppResult<project::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert project: {}", e)))
    }

    /// List projects, newest first.
    pub async fn list_projects(&self) -> AppResult<Vec<project::Model>> {
        Project::find()
            .order_by_desc(project::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: Uuid) -> AppResult<Option<project::Model>> {
        Project::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))
    }

    /// Get a project or fail with NotFound.
    pub async fn require_project(&self, id: Uuid) -> AppResult<project::Model> {
        self.get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))
    }

    /// Update a project.
    pub async fn update_project(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<project::Model> {
        let project = self.require_project(id).await?;

        let mut active: ActiveModel = project.into();
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
            .map_err(|e| AppError::Database(format!("Failed to update project: {}", e)))
    }

    /// Delete a project and, through cascading keys, everything it owns.
    pub async fn delete_project(&self, id: Uuid) -> AppResult<bool> {
        let result = Project::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete project: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
