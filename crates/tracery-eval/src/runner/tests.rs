use super::*;
use crate::evaluator::{AMBIGUOUS, EvaluationResult, RunEvaluator, StringEvaluator};
use async_trait::async_trait;
use futures::stream;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracery_core::error::{TraceError, TraceResult};
use tracery_core::pagination::{Page, PageStream, paginate};
use tracery_core::schemas::{
    DatasetCreate, Example, ExampleCreate, FeedbackSourceType, KvMap, Run, RunCreate, RunType,
};
use tracery_core::store::{CatalogStore, MemoryStore, OperationKind, RunStore};
use uuid::Uuid;

fn kv(value: serde_json::Value) -> KvMap {
    value.as_object().cloned().unwrap()
}

async fn stored_run(store: &MemoryStore, output: Option<&str>) -> Run {
    let mut create = RunCreate::new(Uuid::new_v4(), "root", RunType::Chain)
        .with_inputs(kv(json!({"input": "hello world"})));
    create.outputs = output.map(|o| kv(json!({"output": o})));
    store.create_run(&create).await.unwrap();
    store.read_run(create.id).await.unwrap()
}

fn stream_of(runs: Vec<Run>) -> PageStream<Run> {
    Box::pin(stream::iter(runs.into_iter().map(Ok::<Run, TraceError>)))
}

#[tokio::test]
async fn test_feedback_carries_source_info_and_evaluator_info() {
    let store = Arc::new(MemoryStore::new());
    let run = stored_run(&store, Some("abcd")).await;
    let runner = EvaluationRunner::new(store.clone());
    let evaluator =
        StringEvaluator::jaccard().with_evaluator_info(kv(json!({"threshold": 0.9})));
    let options = EvaluateOptions::new().with_source_info(kv(json!({"suite": "nightly"})));

    let feedback = runner.evaluate_run(&run, &evaluator, &options).await.unwrap();

    assert_eq!(feedback.run_id, run.id);
    assert_eq!(feedback.key, "jaccard");
    let source = feedback.feedback_source.unwrap();
    assert_eq!(source.source_type, FeedbackSourceType::Model);
    assert_eq!(source.metadata, kv(json!({"suite": "nightly", "threshold": 0.9})));
}

#[tokio::test]
async fn test_unresolvable_reference_example_is_ambiguous() {
    let store = Arc::new(MemoryStore::new());
    let mut run = stored_run(&store, Some("abcd")).await;
    run.reference_example_id = Some(Uuid::new_v4());
    let runner = EvaluationRunner::new(store.clone());

    let feedback = runner
        .evaluate_run(&run, &StringEvaluator::jaccard(), &EvaluateOptions::default())
        .await
        .unwrap();

    assert_eq!(feedback.score, Some(-0.5));
    assert_eq!(feedback.value.as_deref(), Some(AMBIGUOUS));
}

#[tokio::test]
async fn test_reevaluation_creates_distinct_feedback() {
    let store = Arc::new(MemoryStore::new());
    let dataset = store.create_dataset(&DatasetCreate::new("qa")).await.unwrap();
    let example = store
        .create_example(
            &ExampleCreate::new(dataset.id, kv(json!({"input": "hello world"})))
                .with_outputs(kv(json!({"output": "bcde"}))),
        )
        .await
        .unwrap();
    let mut run = stored_run(&store, Some("abcd")).await;
    run.reference_example_id = Some(example.id);

    let runner = EvaluationRunner::new(store.clone());
    let evaluator = StringEvaluator::jaccard();
    let first = runner
        .evaluate_run(&run, &evaluator, &EvaluateOptions::default())
        .await
        .unwrap();
    let second = runner
        .evaluate_run(&run, &evaluator, &EvaluateOptions::default())
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.score, Some(0.6));
    assert_eq!(second.value.as_deref(), Some("INCORRECT"));
}

#[tokio::test]
async fn test_evaluate_runs_records_failures_and_keeps_order() {
    let store = Arc::new(MemoryStore::new());
    let mut runs = Vec::new();
    for i in 0..6 {
        let output = if i == 2 { None } else { Some("abcd") };
        runs.push(stored_run(&store, output).await);
    }
    let expected: Vec<_> = runs.iter().map(|r| r.id).collect();

    let summary = EvaluationRunner::new(store.clone())
        .evaluate_runs(
            stream_of(runs),
            &StringEvaluator::jaccard(),
            &EvaluateOptions::new().with_max_concurrency(3),
        )
        .await;

    let order: Vec<_> = summary.outcomes.iter().map(|o| o.run_id).collect();
    assert_eq!(order, expected);
    assert_eq!(summary.succeeded(), 5);
    assert_eq!(summary.failed(), 1);
    assert!(matches!(
        summary.outcomes[2].result,
        Err(TraceError::Evaluator { .. })
    ));
    assert!(summary.cursor_error.is_none());
    assert_eq!(summary.mean_score(), Some(-0.5));
}

#[tokio::test]
async fn test_cursor_error_stops_iteration() {
    let store = Arc::new(MemoryStore::new());
    let first_page = vec![
        stored_run(&store, Some("a")).await,
        stored_run(&store, Some("b")).await,
    ];
    let runs = paginate(0u32, move |page: u32| {
        let first_page = first_page.clone();
        async move {
            match page {
                0 => Ok(Page::new(first_page, Some(1))),
                _ => Err(TraceError::http_status("upstream failed", "http://x/runs", 502)),
            }
        }
    });

    let summary = EvaluationRunner::new(store.clone())
        .evaluate_runs(runs, &StringEvaluator::exact_match(), &EvaluateOptions::default())
        .await;

    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.succeeded(), 2);
    assert!(matches!(
        summary.cursor_error,
        Some(TraceError::Http {
            status_code: Some(502),
            ..
        })
    ));
    assert!(!summary.is_complete());
}

struct ChildCounter;

#[async_trait]
impl RunEvaluator for ChildCounter {
    fn name(&self) -> &str {
        "child_count"
    }

    async fn evaluate_run(
        &self,
        run: &Run,
        _example: Option<&Example>,
    ) -> TraceResult<EvaluationResult> {
        let count = run.child_runs.as_ref().map_or(0, Vec::len);
        Ok(EvaluationResult::new("child_count").with_score(count as f64))
    }
}

#[tokio::test]
async fn test_child_runs_loaded_on_request() {
    let store = Arc::new(MemoryStore::new());
    let root = stored_run(&store, Some("done")).await;
    for order in 2..5 {
        let mut child = RunCreate::new(Uuid::new_v4(), "step", RunType::Tool);
        child.parent_run_id = Some(root.id);
        child.execution_order = order;
        store.create_run(&child).await.unwrap();
    }
    let runner = EvaluationRunner::new(store.clone()).with_page_size(2);

    let without = runner
        .evaluate_run(&root, &ChildCounter, &EvaluateOptions::default())
        .await
        .unwrap();
    let with = runner
        .evaluate_run(&root, &ChildCounter, &EvaluateOptions::new().with_child_runs())
        .await
        .unwrap();

    assert_eq!(without.score, Some(0.0));
    assert_eq!(with.score, Some(3.0));
}

#[tokio::test]
async fn test_feedback_failure_recorded_per_run() {
    let store = Arc::new(MemoryStore::new());
    let runs = vec![
        stored_run(&store, Some("a")).await,
        stored_run(&store, Some("b")).await,
    ];
    store
        .fail_next(OperationKind::CreateFeedback, "feedback endpoint down")
        .await;

    let summary = EvaluationRunner::new(store.clone())
        .evaluate_runs(stream_of(runs), &StringEvaluator::exact_match(), &EvaluateOptions::default())
        .await;

    assert!(summary.outcomes[0].result.is_err());
    assert!(summary.outcomes[1].result.is_ok());
    let ids: HashSet<_> = summary.feedback().map(|f| f.run_id).collect();
    assert_eq!(ids.len(), 1);
    assert!(summary.cursor_error.is_none());
}
