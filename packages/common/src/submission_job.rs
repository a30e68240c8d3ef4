use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Dispatch message sent to the grading worker queue.
///
/// Derived 1:1 from a just-persisted submission; never stored outside the
/// broker. The canonical wire shape, which the consumer must agree on, is a
/// UTF-8 JSON object:
///
/// ```json
/// { "submissionId": "…", "code": "…", "lang": "cpp", "problemId": "…" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionJob {
    /// Id of the persisted submission this job grades.
    pub submission_id: String,
    /// Source text to execute.
    pub code: String,
    pub lang: Language,
    /// Reference to the problem; existence is not validated here.
    pub problem_id: String,
}

impl SubmissionJob {
    pub fn new(submission_id: String, code: String, lang: Language, problem_id: String) -> Self {
        Self {
            submission_id,
            code,
            lang,
            problem_id,
        }
    }
}
