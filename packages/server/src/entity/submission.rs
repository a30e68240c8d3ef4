use common::{Language, SubmissionStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A recorded code submission.
///
/// Rows are created by the orchestrator with `status = pending`, mutated
/// only through status callbacks from the grading worker, and never
/// deleted by this subsystem.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    /// Opaque unique id, assigned at persistence time.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Reference to a problem; existence is not validated here.
    pub problem_id: String,
    pub language: Language,
    #[sea_orm(column_type = "Text")]
    pub code: String,
    pub user_id: Option<String>,
    /// One of: pending, processing, completed, failed.
    pub status: SubmissionStatus,
    /// Serialized `SubmissionResult`; present iff `status` is terminal.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub result: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
