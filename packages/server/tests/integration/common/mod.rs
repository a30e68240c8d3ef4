use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
// Leading `::` keeps the shared crate distinct from this `common` test module.
use ::common::SubmissionStatus;
use chrono::Utc;
use mq::{MqError, Publisher};
use reqwest::Client;
use sea_orm::DbErr;
use serde_json::Value;
use uuid::Uuid;

use server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig};
use server::entity::submission;
use server::repository::{NewSubmission, SubmissionPatch, SubmissionRepository};
use server::services::submission::SubmissionService;
use server::state::AppState;

pub mod routes {
    pub const HEALTH: &str = "/api/v1/health";
    pub const SUBMISSIONS: &str = "/api/v1/submissions";

    pub fn submission(id: &str) -> String {
        format!("/api/v1/submissions/{id}")
    }
}

/// In-memory repository so HTTP tests run without a database.
#[derive(Default)]
pub struct InMemoryRepository {
    rows: Mutex<HashMap<String, submission::Model>>,
}

impl InMemoryRepository {
    /// Direct row access for asserting persisted state.
    pub fn all_rows(&self) -> Vec<submission::Model> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryRepository {
    async fn create(&self, new: NewSubmission) -> Result<submission::Model, DbErr> {
        let now = Utc::now();
        let model = submission::Model {
            id: Uuid::new_v4().to_string(),
            problem_id: new.problem_id,
            language: new.language,
            code: new.code,
            user_id: new.user_id,
            status: SubmissionStatus::Pending,
            result: None,
            created_at: now,
            updated_at: now,
        };
        self.rows
            .lock()
            .unwrap()
            .insert(model.id.clone(), model.clone());
        Ok(model)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<submission::Model>, DbErr> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: SubmissionPatch,
        allowed_from: &[SubmissionStatus],
    ) -> Result<Option<submission::Model>, DbErr> {
        let mut rows = self.rows.lock().unwrap();
        let Some(model) = rows.get_mut(id) else {
            return Ok(None);
        };
        if !allowed_from.contains(&model.status) {
            return Ok(None);
        }
        model.status = patch.status;
        model.result = patch.result;
        model.updated_at = Utc::now();
        Ok(Some(model.clone()))
    }
}

/// Publisher double that records every publish, or fails them all.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(String, Value)>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(String, Value)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, queue: &str, message: Value) -> Result<(), MqError> {
        if self.fail {
            return Err(MqError::Internal("broker unavailable".into()));
        }
        self.published
            .lock()
            .unwrap()
            .push((queue.to_string(), message));
        Ok(())
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub repo: Arc<InMemoryRepository>,
    pub publisher: Arc<RecordingPublisher>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
        },
        mq: mq::MqConfig {
            url: "amqp://unused".to_string(),
            pool_size: 5,
            queue_name: "submission_queue".to_string(),
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_broker(false).await
    }

    pub async fn spawn_with_broker(fail_publish: bool) -> Self {
        let repo = Arc::new(InMemoryRepository::default());
        let publisher = Arc::new(RecordingPublisher {
            fail: fail_publish,
            ..Default::default()
        });

        let config = Arc::new(test_config());
        let submissions = Arc::new(SubmissionService::new(
            repo.clone(),
            publisher.clone(),
            config.mq.queue_name.clone(),
        ));

        let state = AppState {
            submissions,
            config,
        };
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            repo,
            publisher,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// POST a raw body with a JSON content type, bypassing serialization.
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    /// Create a submission via the API and return its `id`.
    pub async fn create_submission(&self, problem_id: &str, lang: &str, code: &str) -> String {
        let res = self
            .post(
                routes::SUBMISSIONS,
                &serde_json::json!({
                    "problemId": problem_id,
                    "lang": lang,
                    "code": code,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_submission failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }

    pub fn error_code(&self) -> &str {
        self.body["code"]
            .as_str()
            .expect("error body should contain 'code'")
    }
}
