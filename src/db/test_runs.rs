//! Database queries for test runs, their scheduled cases and comments.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::comment::{self, Entity as Comment};
use crate::entity::test_run::{self, Entity as TestRun};
use crate::entity::test_run_case::{self, Entity as TestRunCase};
use crate::error::{AppError, AppResult};
use crate::models::UpdateTestRunRequest;

use super::DbPool;

/// Fields for a run about to be inserted.
#[derive(Debug, Clone)]
pub struct NewTestRun {
    pub project_id: Uuid,
    pub test_plan_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,
}

impl DbPool {
    /// Insert a run and schedule `case_ids` in it, atomically.
    pub async fn insert_test_run(
        &self,
        new_run: NewTestRun,
        case_ids: &[Uuid],
    ) -> AppResult<(test_run::Model, Vec<test_run_case::Model>)> {
        let now = Utc::now();
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let run = test_run::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(new_run.project_id),
            test_plan_id: Set(new_run.test_plan_id),
            name: Set(new_run.name),
            description: Set(new_run.description),
            assignee_id: Set(new_run.assignee_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert test run: {}", e)))?;

        let mut cases = Vec::with_capacity(case_ids.len());
        for case_id in case_ids {
            let case = test_run_case::ActiveModel {
                id: Set(Uuid::now_v7()),
                test_run_id: Set(run.id),
                test_case_id: Set(*case_id),
                status_id: Set(None),
                assignee_id: Set(new_run.assignee_id),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to schedule test case: {}", e)))?;
            cases.push(case);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit test run: {}", e)))?;

        Ok((run, cases))
    }

    /// List runs of a project, newest first.
    pub async fn list_test_runs(&self, project_id: Uuid) -> AppResult<Vec<test_run::Model>> {
        TestRun::find()
            .filter(test_run::Column::ProjectId.eq(project_id))
            .order_by_desc(test_run::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test runs: {}", e)))
    }

    pub async fn get_test_run(&self, id: Uuid) -> AppResult<Option<test_run::Model>> {
        TestRun::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))
    }

    pub async fn update_test_run(
        &self,
        id: Uuid,
        changes: UpdateTestRunRequest,
    ) -> AppResult<test_run::Model> {
        let run = self
            .get_test_run(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test run {}", id)))?;

        let mut active: test_run::ActiveModel = run.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(assignee_id) = changes.assignee_id {
            active.assignee_id = Set(Some(assignee_id));
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test run: {}", e)))
    }

    pub async fn delete_test_run(&self, id: Uuid) -> AppResult<bool> {
        let result = TestRun::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test run: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Cases scheduled in a run, in scheduling order.
    pub async fn list_test_run_cases(&self, run_id: Uuid) -> AppResult<Vec<test_run_case::Model>> {
        TestRunCase::find()
            .filter(test_run_case::Column::TestRunId.eq(run_id))
            .order_by_asc(test_run_case::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list run cases: {}", e)))
    }

    pub async fn get_test_run_case(&self, id: Uuid) -> AppResult<Option<test_run_case::Model>> {
        TestRunCase::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get run case: {}", e)))
    }

    /// Record a result status and/or assignee on a scheduled case.
    pub async fn update_test_run_case(
        &self,
        id: Uuid,
        status_id: Option<Uuid>,
        assignee_id: Option<Uuid>,
    ) -> AppResult<test_run_case::Model> {
        let case = self
            .get_test_run_case(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Run case {}", id)))?;

        let mut active: test_run_case::ActiveModel = case.into();
        if let Some(status_id) = status_id {
            active.status_id = Set(Some(status_id));
        }
        if let Some(assignee_id) = assignee_id {
            active.assignee_id = Set(Some(assignee_id));
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update run case: {}", e)))
    }

    /// Comments on a scheduled case, oldest first.
    pub async fn list_comments(&self, run_case_id: Uuid) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::TestRunCaseId.eq(run_case_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list comments: {}", e)))
    }

    pub async fn insert_comment(
        &self,
        run_case_id: Uuid,
        user_id: Uuid,
        content: String,
    ) -> AppResult<comment::Model> {
        let now = Utc::now();

        comment::ActiveModel {
            id: Set(Uuid::now_v7()),
            test_run_case_id: Set(run_case_id),
            user_id: Set(user_id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert comment: {}", e)))
    }
}
