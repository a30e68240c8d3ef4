use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

/// Grading outcome attached to a submission once it reaches a terminal
/// status. Serialized in camelCase; absent fields are omitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub verdict: Verdict,
    /// Score in [0, 100], if the problem is scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    /// Total execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<i32>,
    /// Peak memory used in kilobytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_used: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_cases_passed: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_test_cases: Option<i32>,
    /// Worker-reported error detail (compile log, crash message).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    /// A bare result carrying only a verdict.
    pub fn from_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            score: None,
            execution_time: None,
            memory_used: None,
            test_cases_passed: None,
            total_test_cases: None,
            error: None,
        }
    }
}
