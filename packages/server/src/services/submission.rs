use std::sync::Arc;

use common::SubmissionJob;
use mq::Publisher;
use tracing::{error, info};

use crate::error::AppError;
use crate::models::submission::{
    CreateSubmissionRequest, SubmissionResponse, UpdateSubmissionStatusRequest,
};
use crate::repository::{NewSubmission, SubmissionPatch, SubmissionRepository};

/// Orchestrates the submission lifecycle: persistence, queue dispatch and
/// status transitions.
pub struct SubmissionService {
    repo: Arc<dyn SubmissionRepository>,
    publisher: Arc<dyn Publisher>,
    queue_name: String,
}

impl SubmissionService {
    pub fn new(
        repo: Arc<dyn SubmissionRepository>,
        publisher: Arc<dyn Publisher>,
        queue_name: String,
    ) -> Self {
        Self {
            repo,
            publisher,
            queue_name,
        }
    }

    /// Persist a new submission, then dispatch a grading job for it.
    ///
    /// The row is written before the publish is attempted. If the publish
    /// fails the row stays pending and the error propagates to the caller;
    /// a pending record with no queued job is reconciled out of band.
    pub async fn create_submission(
        &self,
        req: CreateSubmissionRequest,
    ) -> Result<SubmissionResponse, AppError> {
        let saved = self
            .repo
            .create(NewSubmission {
                problem_id: req.problem_id,
                language: req.lang,
                code: req.code,
                user_id: req.user_id,
            })
            .await?;

        info!(submission_id = %saved.id, "Submission created");

        let job = SubmissionJob::new(
            saved.id.clone(),
            saved.code.clone(),
            saved.language,
            saved.problem_id.clone(),
        );
        let message = serde_json::to_value(&job)
            .map_err(|e| AppError::Internal(format!("Failed to serialize job: {e}")))?;

        if let Err(e) = self.publisher.publish(&self.queue_name, message).await {
            error!(
                submission_id = %saved.id,
                error = %e,
                "Failed to publish grading job; record remains pending",
            );
            return Err(e.into());
        }

        saved.try_into()
    }

    pub async fn get_submission(&self, id: &str) -> Result<SubmissionResponse, AppError> {
        let model = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission '{id}' not found")))?;
        model.try_into()
    }

    /// Apply a status callback from the grading worker.
    ///
    /// Enforces the state machine (no reversals, no self-transitions, no
    /// leaving a terminal status) and the result invariant (a result must
    /// accompany exactly the terminal statuses).
    pub async fn update_submission_status(
        &self,
        id: &str,
        req: UpdateSubmissionStatusRequest,
    ) -> Result<SubmissionResponse, AppError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission '{id}' not found")))?;

        if !existing.status.can_transition_to(req.status) {
            return Err(AppError::InvalidTransition {
                from: existing.status,
                to: req.status,
            });
        }

        if req.status.is_terminal() && req.result.is_none() {
            return Err(AppError::Validation(format!(
                "A result is required when setting status '{}'",
                req.status
            )));
        }
        if !req.status.is_terminal() && req.result.is_some() {
            return Err(AppError::Validation(format!(
                "A result is not allowed with non-terminal status '{}'",
                req.status
            )));
        }

        let result = req
            .result
            .map(|r| serde_json::to_value(&r))
            .transpose()
            .map_err(|e| AppError::Internal(format!("Failed to serialize result: {e}")))?;

        // The transition guard above worked off a read that may be stale by
        // the time the write lands; the conditional update re-checks it
        // atomically. A miss here is either a vanished row or a racing
        // callback that moved the status first.
        let updated = self
            .repo
            .update_by_id(
                id,
                SubmissionPatch {
                    status: req.status,
                    result,
                },
                req.status.allowed_sources(),
            )
            .await?;

        let Some(updated) = updated else {
            return match self.repo.find_by_id(id).await? {
                Some(current) => Err(AppError::InvalidTransition {
                    from: current.status,
                    to: req.status,
                }),
                None => Err(AppError::NotFound(format!("Submission '{id}' not found"))),
            };
        };

        info!(submission_id = %id, status = %req.status, "Submission status updated");

        updated.try_into()
    }
}
