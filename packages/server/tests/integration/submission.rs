use crate::common::{TestApp, routes};
use serde_json::json;

/// Create a minimal valid submission payload.
fn valid_submission_body() -> serde_json::Value {
    json!({
        "problemId": "two-sum",
        "lang": "cpp",
        "code": "#include <iostream>\nint main() {}",
    })
}

fn accepted_result_body() -> serde_json::Value {
    json!({
        "verdict": "ACCEPTED",
        "score": 100,
        "testCasesPassed": 15,
        "totalTestCases": 15,
    })
}

mod submission_creation {
    use super::*;

    #[tokio::test]
    async fn client_can_create_a_submission() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::SUBMISSIONS, &valid_submission_body()).await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["problemId"], "two-sum");
        assert_eq!(res.body["lang"], "cpp");
        assert_eq!(res.body["status"], "pending");
        assert!(res.body["result"].is_null());
        assert!(res.body["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn creation_publishes_canonical_queue_message() {
        let app = TestApp::spawn().await;

        let id = app
            .create_submission("two-sum", "python3", "print(42)")
            .await;

        let published = app.publisher.published();
        assert_eq!(published.len(), 1);
        let (queue, message) = &published[0];
        assert_eq!(queue, "submission_queue");
        assert_eq!(
            *message,
            json!({
                "submissionId": id,
                "code": "print(42)",
                "lang": "python3",
                "problemId": "two-sum",
            })
        );
    }

    #[tokio::test]
    async fn rejects_unsupported_language() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::SUBMISSIONS,
                &json!({
                    "problemId": "two-sum",
                    "lang": "java",
                    "code": "public class Main {}",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_empty_code() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::SUBMISSIONS,
                &json!({
                    "problemId": "two-sum",
                    "lang": "cpp",
                    "code": "",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_missing_problem_id() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::SUBMISSIONS,
                &json!({
                    "lang": "cpp",
                    "code": "int main() {}",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_structured_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::SUBMISSIONS, "{not json").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn publish_failure_returns_broker_error_and_keeps_pending_row() {
        let app = TestApp::spawn_with_broker(true).await;

        let res = app.post(routes::SUBMISSIONS, &valid_submission_body()).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.error_code(), "BROKER_ERROR");

        // The record outlives the failed dispatch, still pending.
        let rows = app.repo.all_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, ::common::SubmissionStatus::Pending);
        assert!(rows[0].result.is_none());
        assert!(app.publisher.published().is_empty());
    }
}

mod submission_retrieval {
    use super::*;

    #[tokio::test]
    async fn client_can_fetch_a_submission_by_id() {
        let app = TestApp::spawn().await;
        let id = app
            .create_submission("two-sum", "cpp", "int main() {}")
            .await;

        let res = app.get(&routes::submission(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id.as_str());
        assert_eq!(res.body["status"], "pending");
        assert_eq!(res.body["code"], "int main() {}");
    }

    #[tokio::test]
    async fn unknown_id_returns_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::submission("no-such-id")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }
}

mod status_updates {
    use super::*;

    #[tokio::test]
    async fn full_lifecycle_reaches_completed_with_result() {
        let app = TestApp::spawn().await;
        let id = app
            .create_submission("two-sum", "cpp", "int main() {}")
            .await;

        let res = app
            .patch(&routes::submission(&id), &json!({ "status": "processing" }))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "processing");

        let res = app
            .patch(
                &routes::submission(&id),
                &json!({ "status": "completed", "result": accepted_result_body() }),
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "completed");
        assert_eq!(res.body["result"]["verdict"], "ACCEPTED");
        assert_eq!(res.body["result"]["score"], 100);
    }

    #[tokio::test]
    async fn worker_may_skip_processing_and_complete_directly() {
        let app = TestApp::spawn().await;
        let id = app
            .create_submission("two-sum", "cpp", "int main() {}")
            .await;

        let res = app
            .patch(
                &routes::submission(&id),
                &json!({ "status": "completed", "result": accepted_result_body() }),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "completed");
    }

    #[tokio::test]
    async fn reversal_from_terminal_status_is_a_conflict() {
        let app = TestApp::spawn().await;
        let id = app
            .create_submission("two-sum", "cpp", "int main() {}")
            .await;
        app.patch(
            &routes::submission(&id),
            &json!({
                "status": "failed",
                "result": { "verdict": "COMPILATION_ERROR", "error": "main.cpp:1: error" },
            }),
        )
        .await;

        let res = app
            .patch(&routes::submission(&id), &json!({ "status": "processing" }))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.error_code(), "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn self_transition_is_a_conflict() {
        let app = TestApp::spawn().await;
        let id = app
            .create_submission("two-sum", "cpp", "int main() {}")
            .await;

        let res = app
            .patch(&routes::submission(&id), &json!({ "status": "pending" }))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.error_code(), "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn terminal_status_without_result_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app
            .create_submission("two-sum", "cpp", "int main() {}")
            .await;

        let res = app
            .patch(&routes::submission(&id), &json!({ "status": "completed" }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn result_with_non_terminal_status_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app
            .create_submission("two-sum", "cpp", "int main() {}")
            .await;

        let res = app
            .patch(
                &routes::submission(&id),
                &json!({ "status": "processing", "result": accepted_result_body() }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_id_returns_404() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(
                &routes::submission("no-such-id"),
                &json!({ "status": "processing" }),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn invalid_status_string_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let id = app
            .create_submission("two-sum", "cpp", "int main() {}")
            .await;

        let res = app
            .patch(&routes::submission(&id), &json!({ "status": "done" }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }
}
