#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a submission.
///
/// Statuses only move forward: `pending` → `processing` → `completed` |
/// `failed`. A worker may skip `processing` and report a terminal status
/// directly, but a terminal status is never left again.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in
/// SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Recorded and queued, not yet picked up by a worker.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pending"))]
    Pending,
    /// A worker is executing the submission.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "processing"))]
    Processing,
    /// Graded; a result is attached.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "completed"))]
    Completed,
    /// Grading failed; a result with error details is attached.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "failed"))]
    Failed,
}

impl SubmissionStatus {
    /// Returns true if the lifecycle is over and a result must be present.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    ///
    /// Forward jumps are allowed (a worker may report `completed` without an
    /// intermediate `processing` update); reversals and self-transitions are
    /// not.
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        const fn allowed(from: SubmissionStatus) -> &'static [SubmissionStatus] {
            match from {
                SubmissionStatus::Pending => &[
                    SubmissionStatus::Processing,
                    SubmissionStatus::Completed,
                    SubmissionStatus::Failed,
                ],
                SubmissionStatus::Processing => {
                    &[SubmissionStatus::Completed, SubmissionStatus::Failed]
                }
                SubmissionStatus::Completed | SubmissionStatus::Failed => &[],
            }
        }
        allowed(*self).contains(&next)
    }

    /// Statuses from which the state machine permits moving into `self`.
    ///
    /// This is the transition table inverted; persistence layers use it to
    /// apply a status change conditionally in a single statement instead of
    /// checking and writing in two steps.
    pub const fn allowed_sources(self) -> &'static [SubmissionStatus] {
        match self {
            Self::Pending => &[],
            Self::Processing => &[Self::Pending],
            Self::Completed | Self::Failed => &[Self::Pending, Self::Processing],
        }
    }

    /// All possible status values.
    pub const ALL: &'static [SubmissionStatus] = &[
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Failed,
    ];

    /// The terminal statuses.
    pub const TERMINAL: &'static [SubmissionStatus] = &[Self::Completed, Self::Failed];

    /// Returns the string representation (lowercase, the wire form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            SubmissionStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for SubmissionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
