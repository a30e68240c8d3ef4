pub mod language;
pub mod submission_job;
pub mod submission_result;
pub mod submission_status;
pub mod verdict;

pub use language::Language;
pub use submission_job::SubmissionJob;
pub use submission_result::SubmissionResult;
pub use submission_status::SubmissionStatus;
pub use verdict::Verdict;
