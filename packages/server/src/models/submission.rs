use chrono::{DateTime, Utc};
use common::{Language, SubmissionResult, SubmissionStatus};
use serde::{Deserialize, Serialize};

use crate::entity::submission;
use crate::error::AppError;

/// Request body for creating a submission.
#[derive(Clone, Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    /// Problem the submission targets. Not validated for existence here.
    #[schema(example = "two-sum")]
    pub problem_id: String,
    #[schema(example = "cpp")]
    pub lang: Language,
    /// Source text. Size ceilings are enforced by the transport layer.
    #[schema(example = "int main() { return 0; }")]
    pub code: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Status callback body sent by the grading worker.
#[derive(Clone, Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateSubmissionStatusRequest {
    pub status: SubmissionStatus,
    /// Required for terminal statuses, rejected otherwise.
    #[serde(default)]
    pub result: Option<SubmissionResult>,
}

/// Full submission record.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    #[schema(example = "5f7a9c0e-2b3d-4a1f-9e8b-6c5d4e3f2a1b")]
    pub id: String,
    #[schema(example = "two-sum")]
    pub problem_id: String,
    #[schema(example = "cpp")]
    pub lang: Language,
    pub code: String,
    pub user_id: Option<String>,
    pub status: SubmissionStatus,
    /// Grading outcome; present iff the status is terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SubmissionResult>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<submission::Model> for SubmissionResponse {
    type Error = AppError;

    fn try_from(m: submission::Model) -> Result<Self, AppError> {
        let result = m
            .result
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| AppError::Internal(format!("Stored result is malformed: {e}")))?;

        Ok(Self {
            id: m.id,
            problem_id: m.problem_id,
            lang: m.language,
            code: m.code,
            user_id: m.user_id,
            status: m.status,
            result,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// Validate a submission creation request beyond type shape.
pub fn validate_create_submission(req: &CreateSubmissionRequest) -> Result<(), AppError> {
    if req.problem_id.trim().is_empty() {
        return Err(AppError::Validation("problemId is required".into()));
    }
    if req.code.is_empty() {
        return Err(AppError::Validation("code must not be empty".into()));
    }
    Ok(())
}
