use async_trait::async_trait;
use chrono::Utc;
use common::{Language, SubmissionStatus};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::submission;

/// Fields needed to persist a new submission. Id, status and timestamps
/// are assigned by the repository.
pub struct NewSubmission {
    pub problem_id: String,
    pub language: Language,
    pub code: String,
    pub user_id: Option<String>,
}

/// Status change applied by `update_by_id`; `updated_at` is bumped by the
/// repository.
pub struct SubmissionPatch {
    pub status: SubmissionStatus,
    pub result: Option<serde_json::Value>,
}

/// Persistence operations consumed by the orchestrator.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persist a new submission with `status = pending` and a freshly
    /// assigned id.
    async fn create(&self, new: NewSubmission) -> Result<submission::Model, DbErr>;

    async fn find_by_id(&self, id: &str) -> Result<Option<submission::Model>, DbErr>;

    /// Apply `patch` to the submission with `id`, but only while its stored
    /// status is one of `allowed_from`. The guard and the write are a
    /// single statement, so two concurrent callbacks cannot both pass the
    /// status check. Returns `None` when no row matched, either because the
    /// id does not exist or because the stored status was not in
    /// `allowed_from`.
    async fn update_by_id(
        &self,
        id: &str,
        patch: SubmissionPatch,
        allowed_from: &[SubmissionStatus],
    ) -> Result<Option<submission::Model>, DbErr>;
}

/// SeaORM-backed repository.
pub struct DbSubmissionRepository {
    db: DatabaseConnection,
}

impl DbSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubmissionRepository for DbSubmissionRepository {
    async fn create(&self, new: NewSubmission) -> Result<submission::Model, DbErr> {
        let now = Utc::now();
        let model = submission::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            problem_id: Set(new.problem_id),
            language: Set(new.language),
            code: Set(new.code),
            user_id: Set(new.user_id),
            status: Set(SubmissionStatus::Pending),
            result: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<submission::Model>, DbErr> {
        submission::Entity::find_by_id(id.to_owned()).one(&self.db).await
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: SubmissionPatch,
        allowed_from: &[SubmissionStatus],
    ) -> Result<Option<submission::Model>, DbErr> {
        // UPDATE .. WHERE id = ? AND status IN (allowed_from): the status
        // guard travels with the write, so a caller holding a stale read
        // simply matches no row.
        let updated = submission::Entity::update_many()
            .col_expr(submission::Column::Status, Expr::value(patch.status))
            .col_expr(submission::Column::Result, Expr::value(patch.result))
            .col_expr(submission::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(submission::Column::Id.eq(id))
            .filter(submission::Column::Status.is_in(allowed_from.iter().copied()))
            .exec(&self.db)
            .await?;

        if updated.rows_affected == 0 {
            return Ok(None);
        }
        submission::Entity::find_by_id(id.to_owned()).one(&self.db).await
    }
}
