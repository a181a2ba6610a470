//! Database operations for statuses.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::status::{self, ActiveModel, Entity as Status};
use crate::error::{AppError, AppResult};
use crate::models::CreateStatusRequest;

use super::DbPool;

fn new_status(definition: CreateStatusRequest) -> ActiveModel {
    let now = Utc::now();
    ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(definition.name.trim().to_string()),
        color: Set(definition.color),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Insert several statuses through any connection, including a transaction.
pub async fn insert_statuses<C>(conn: &C, definitions: Vec<CreateStatusRequest>) -> Result<usize, DbErr>
where
    C: ConnectionTrait,
{
    let count = definitions.len();
    for definition in definitions {
        new_status(definition).insert(conn).await?;
    }
    Ok(count)
}

impl DbPool {
    /// Count all statuses.
    pub async fn count_statuses(&self) -> AppResult<u64> {
        Ok(Status::find().count(self.connection()).await?)
    }

    /// List statuses in creation order.
    pub async fn list_statuses(&self) -> AppResult<Vec<status::Model>> {
        Ok(Status::find()
            .order_by_asc(status::Column::CreatedAt)
            .order_by_asc(status::Column::Id)
            .all(self.connection())
            .await?)
    }

    pub async fn get_status(&self, id: Uuid) -> AppResult<Option<status::Model>> {
        Ok(Status::find_by_id(id).one(self.connection()).await?)
    }

    /// Insert a single status.
    pub async fn insert_status(&self, definition: CreateStatusRequest) -> AppResult<status::Model> {
        Ok(new_status(definition).insert(self.connection()).await?)
    }

    /// Rename or recolor a status.
    pub async fn update_status(
        &self,
        id: Uuid,
        name: Option<String>,
        color: Option<String>,
    ) -> AppResult<status::Model> {
        let existing = self
            .get_status(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Status {}", id)))?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(color) = color {
            active.color = Set(Some(color));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(self.connection()).await?)
    }

    /// Delete a status. Returns false if no such status exists.
    pub async fn delete_status(&self, id: Uuid) -> AppResult<bool> {
        let result = Status::delete_by_id(id).exec(self.connection()).await?;
        Ok(result.rows_affected > 0)
    }
}
