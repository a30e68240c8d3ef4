use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::submission::SubmissionService;

#[derive(Clone)]
pub struct AppState {
    pub submissions: Arc<SubmissionService>,
    pub config: Arc<AppConfig>,
}
