use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::submission::{
    CreateSubmissionRequest, SubmissionResponse, UpdateSubmissionStatusRequest,
    validate_create_submission,
};
use crate::state::AppState;

/// Create a submission and dispatch it for grading.
#[utoipa::path(
    post,
    path = "/",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit a solution for grading",
    description = "Persists the submission with status `pending`, then publishes a grading job to the queue. If the publish fails, the persisted record remains pending and the request fails with BROKER_ERROR.",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission created and queued", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Queue dispatch failed (BROKER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(problem_id = %payload.problem_id))]
pub async fn create_submission(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_submission(&payload)?;
    let response = state.submissions.create_submission(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a single submission by ID.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "getSubmission",
    summary = "Get submission details",
    params(
        ("id" = String, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission details", body = SubmissionResponse),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(submission_id = %id))]
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let response = state.submissions.get_submission(&id).await?;
    Ok(Json(response))
}

/// Apply a status callback from the grading worker.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "updateSubmissionStatus",
    summary = "Update submission status",
    description = "Moves the submission forward through its lifecycle. Terminal statuses require a result; non-terminal statuses forbid one. Reversals and self-transitions are rejected.",
    params(
        ("id" = String, Path, description = "Submission ID")
    ),
    request_body = UpdateSubmissionStatusRequest,
    responses(
        (status = 200, description = "Submission updated", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Disallowed status transition (INVALID_TRANSITION)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(submission_id = %id, status = %payload.status))]
pub async fn update_submission_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateSubmissionStatusRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let response = state
        .submissions
        .update_submission_status(&id, payload)
        .await?;
    Ok(Json(response))
}
