//! Contract tests for TaskClient against the Pulp tasks endpoint.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `{task_href}` | `state_*`, `waiting_or_running_*`, `poll_*`, `get_*` |

use pulp_ostree_client::{PulpClient, PulpError, TaskHref, TaskPoll, TaskState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TASK: &str = "/pulp/api/v3/tasks/0190a1b2-cccc-7000-8000-000000000003/";

fn test_client(mock_server: &MockServer) -> PulpClient {
    PulpClient::new(mock_server.uri().parse().unwrap(), None)
}

async fn mount_task(mock_server: &MockServer, state: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(TASK))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "pulp_href": TASK,
            "pulp_created": "2026-10-01T12:00:00Z",
            "state": state,
            "name": "pulp_ostree.app.tasks.importing.import_all_refs_and_commits",
            "started_at": "2026-10-01T12:00:01Z",
            "finished_at": null,
            "error": null,
            "worker": "/pulp/api/v3/workers/1/",
            "created_resources": []
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn state_reads_each_known_state() {
    for expected in TaskState::ALL {
        let mock_server = MockServer::start().await;
        mount_task(&mock_server, serde_json::json!(expected.as_str())).await;

        let state = test_client(&mock_server)
            .tasks()
            .state(&TaskHref::new(TASK))
            .await
            .unwrap();
        assert_eq!(state, expected);
    }
}

#[tokio::test]
async fn state_rejects_empty_string() {
    let mock_server = MockServer::start().await;
    mount_task(&mock_server, serde_json::json!("")).await;

    let err = test_client(&mock_server)
        .tasks()
        .state(&TaskHref::new(TASK))
        .await
        .unwrap_err();
    assert!(matches!(err, PulpError::EmptyState { .. }));
}

#[tokio::test]
async fn state_rejects_null() {
    let mock_server = MockServer::start().await;
    mount_task(&mock_server, serde_json::Value::Null).await;

    let err = test_client(&mock_server)
        .tasks()
        .state(&TaskHref::new(TASK))
        .await
        .unwrap_err();
    assert!(matches!(err, PulpError::EmptyState { .. }));
}

#[tokio::test]
async fn waiting_or_running_matches_state() {
    for (state, expected) in [
        ("waiting", true),
        ("running", true),
        ("skipped", false),
        ("completed", false),
        ("failed", false),
        ("canceled", false),
        ("canceling", false),
    ] {
        let mock_server = MockServer::start().await;
        mount_task(&mock_server, serde_json::json!(state)).await;

        let got = test_client(&mock_server)
            .tasks()
            .waiting_or_running(&TaskHref::new(TASK))
            .await;
        assert_eq!(got, expected, "state {state}");
    }
}

#[tokio::test]
async fn waiting_or_running_is_false_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASK))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert!(!client.tasks().waiting_or_running(&TaskHref::new(TASK)).await);
    assert!(matches!(
        client.tasks().poll(&TaskHref::new(TASK)).await,
        TaskPoll::QueryFailed(PulpError::Remote {
            status: Some(500),
            ..
        })
    ));
}

#[tokio::test]
async fn get_returns_failed_task_error_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASK))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "pulp_href": TASK,
            "state": "failed",
            "error": {"description": "tarball has no 'repo' directory"},
            "created_resources": []
        })))
        .mount(&mock_server)
        .await;

    let task = test_client(&mock_server)
        .tasks()
        .get(&TaskHref::new(TASK))
        .await
        .unwrap();
    assert_eq!(task.state.as_deref(), Some("failed"));
    assert!(task.error.unwrap().to_string().contains("no 'repo' directory"));
}

#[tokio::test]
async fn state_of_completed_task_with_unresolved_resource() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASK))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "pulp_href": TASK,
            "state": "completed",
            "created_resources": [null]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let task = TaskHref::new(TASK);
    assert_eq!(client.tasks().state(&task).await.unwrap(), TaskState::Completed);
    assert!(matches!(
        client.tasks().poll(&task).await,
        TaskPoll::Finished(TaskState::Completed)
    ));
    assert!(!client.tasks().waiting_or_running(&task).await);
}
