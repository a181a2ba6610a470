//! Database operations for users.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::role;
use crate::entity::user::{self, ActiveModel, Entity as User};
use crate::error::{AppError, AppResult};
use crate::models::UserStatus;

use super::DbPool;

/// Fields for a user row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub status: UserStatus,
    pub language: String,
    pub role_id: Option<Uuid>,
}

/// Insert a user through any connection, including an open transaction.
pub async fn insert_user<C>(conn: &C, new_user: NewUser) -> Result<user::Model, DbErr>
where
    C: ConnectionTrait,
{
    let now = Utc::now();

    ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(new_user.name),
        email: Set(new_user.email),
        password: Set(new_user.password_hash),
        status: Set(new_user.status.as_str().to_string()),
        language: Set(new_user.language),
        role_id: Set(new_user.role_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// Changes applied by [`DbPool::update_user`]; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub status: Option<UserStatus>,
    pub language: Option<String>,
    pub role_id: Option<Uuid>,
}

impl DbPool {
    /// Count all users.
    pub async fn count_users(&self) -> AppResult<u64> {
        Ok(User::find().count(self.connection()).await?)
    }

    /// List users ordered by name.
    pub async fn list_users(&self) -> AppResult<Vec<user::Model>> {
        Ok(User::find()
            .order_by_asc(user::Column::Name)
            .all(self.connection())
            .await?)
    }

    /// Find a user by ID.
    pub async fn get_user(&self, id: Uuid) -> AppResult<Option<user::Model>> {
        Ok(User::find_by_id(id).one(self.connection()).await?)
    }

    /// Find a role by ID.
    pub async fn get_role(&self, id: Uuid) -> AppResult<Option<role::Model>> {
        Ok(role::Entity::find_by_id(id).one(self.connection()).await?)
    }

    /// Find a user by email (case-insensitive on input, stored lowercase).
    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.connection())
            .await?)
    }

    /// Update profile fields of a user.
    pub async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<user::Model> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(language) = changes.language {
            active.language = Set(language);
        }
        if let Some(role_id) = changes.role_id {
            active.role_id = Set(Some(role_id));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(self.connection()).await?)
    }

    /// Replace the stored password hash.
    pub async fn update_user_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;

        let mut active: ActiveModel = existing.into();
        active.password = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active.update(self.connection()).await?;

        Ok(())
    }

    /// Delete a user. Returns false if no such user exists.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let result = User::delete_by_id(id).exec(self.connection()).await?;
        Ok(result.rows_affected > 0)
    }
}
