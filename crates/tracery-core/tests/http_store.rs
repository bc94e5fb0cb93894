//! HttpStore against a mock tracing service.
//!
//! Covers status mapping (404/5xx), project-name resolution, paging and
//! request bodies.

use futures::TryStreamExt;
use serde_json::json;
use tracery_core::config::ClientConfig;
use tracery_core::pagination::PageRequest;
use tracery_core::schemas::{
    FeedbackCreate, FeedbackSource, KvMap, RunCreate, RunType, RunUpdate,
};
use tracery_core::store::{HttpStore, RunFilter, RunStore};
use tracery_core::{Client, TraceError};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_store(mock_server: &MockServer) -> HttpStore {
    HttpStore::new(ClientConfig::new(mock_server.uri())).expect("failed to create store")
}

fn kv(value: serde_json::Value) -> KvMap {
    value.as_object().cloned().unwrap()
}

fn run_json(id: Uuid, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "run_type": "chain",
        "start_time": "2024-05-01T12:00:00Z",
        "execution_order": 1
    })
}

#[tokio::test]
async fn test_read_run_404_is_not_found() {
    let mock_server = MockServer::start().await;
    let run_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/runs/{}", run_id)))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such run"))
        .mount(&mock_server)
        .await;

    let err = create_test_store(&mock_server)
        .read_run(run_id)
        .await
        .unwrap_err();
    assert!(matches!(err, TraceError::NotFound { .. }));
}

#[tokio::test]
async fn test_server_error_keeps_status_and_truncates_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(503).set_body_string("x".repeat(2000)))
        .mount(&mock_server)
        .await;

    let create = RunCreate::new(Uuid::new_v4(), "root", RunType::Chain);
    let err = create_test_store(&mock_server)
        .create_run(&create)
        .await
        .unwrap_err();

    match err {
        TraceError::Http {
            message,
            status_code,
            url,
            ..
        } => {
            assert_eq!(status_code, Some(503));
            assert_eq!(url, Some(format!("{}/runs", mock_server.uri())));
            assert!(message.ends_with("..."));
            assert!(message.len() < 600);
        }
        other => panic!("expected http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_project_name_resolved_and_short_page_ends_listing() {
    let mock_server = MockServer::start().await;
    let project_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/sessions"))
        .and(query_param("name", "agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": project_id,
            "name": "agents",
            "created_at": "2024-05-01T12:00:00Z"
        }])))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/runs"))
        .and(query_param("session", project_id.to_string()))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            run_json(Uuid::new_v4(), "first"),
            run_json(Uuid::new_v4(), "second"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/runs"))
        .and(query_param("session", project_id.to_string()))
        .and(query_param("offset", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([run_json(Uuid::new_v4(), "third")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(ClientConfig::new(mock_server.uri()).with_page_size(2)).unwrap();
    let runs: Vec<_> = client
        .list_runs(RunFilter::new().project_name("agents"))
        .try_collect()
        .await
        .unwrap();

    let names: Vec<_> = runs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_unknown_project_name_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sessions"))
        .and(query_param("name", "ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = create_test_store(&mock_server)
        .list_runs(&RunFilter::new().project_name("ghost"), PageRequest::first(10))
        .await
        .unwrap_err();
    assert!(matches!(err, TraceError::NotFound { .. }));
}

#[tokio::test]
async fn test_create_and_update_run_bodies() {
    let mock_server = MockServer::start().await;
    let run_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/runs"))
        .and(body_partial_json(json!({
            "id": run_id,
            "name": "root",
            "run_type": "chain",
            "session_name": "agents",
            "inputs": {"input": "hello world"}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/runs/{}", run_id)))
        .and(body_partial_json(json!({"outputs": {"output": "abcd"}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = create_test_store(&mock_server);
    let create = RunCreate::new(run_id, "root", RunType::Chain)
        .with_project("agents")
        .with_inputs(kv(json!({"input": "hello world"})));
    store.create_run(&create).await.unwrap();
    store
        .update_run(run_id, &RunUpdate::outputs(kv(json!({"output": "abcd"}))))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_feedback_body_and_response() {
    let mock_server = MockServer::start().await;
    let run_id = Uuid::new_v4();
    let feedback_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/feedback"))
        .and(body_partial_json(json!({
            "run_id": run_id,
            "key": "jaccard",
            "score": 0.6,
            "value": "INCORRECT",
            "feedback_source": {"type": "model", "metadata": {"suite": "nightly"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": feedback_id,
            "run_id": run_id,
            "key": "jaccard",
            "score": 0.6,
            "value": "INCORRECT",
            "created_at": "2024-05-01T12:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let feedback = FeedbackCreate::new(run_id, "jaccard")
        .with_score(0.6)
        .with_value("INCORRECT")
        .with_source(FeedbackSource::model(kv(json!({"suite": "nightly"}))));
    let stored = create_test_store(&mock_server)
        .create_feedback(&feedback)
        .await
        .unwrap();

    assert_eq!(stored.id, feedback_id);
    assert_eq!(stored.run_id, run_id);
    assert_eq!(stored.score, Some(0.6));
}
