//! In-process store
//!
//! Behaves like the remote service as far as the client contract goes: runs
//! are upserted by id, updates to unknown runs are rejected, filters are
//! evaluated store-side and listings are paged. Every completed operation is
//! appended to an operation log, and one-shot failures can be injected, which
//! makes the store useful for exercising ordering and failure paths.

use super::filters::{DatasetFilter, ExampleFilter, FeedbackFilter, RunFilter};
use super::trait_def::{CatalogStore, RunStore};
use crate::config::DEFAULT_PROJECT;
use crate::error::{TraceError, TraceResult};
use crate::pagination::{Page, PageRequest};
use crate::schemas::{
    Dataset, DatasetCreate, Example, ExampleCreate, ExampleId, ExampleUpdate, Feedback,
    FeedbackCreate, Project, ProjectCreate, Run, RunCreate, RunId, RunUpdate, Selector,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Kind of store operation, used for the operation log and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateRun,
    UpdateRun,
    ReadRun,
    DeleteRun,
    ListRuns,
    ReadExample,
    CreateFeedback,
    ListFeedback,
    Catalog,
}

/// One completed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOperation {
    pub kind: OperationKind,
    pub target: Option<Uuid>,
}

#[derive(Default)]
struct MemoryState {
    runs: HashMap<RunId, Run>,
    /// Run ids in first-creation order, so listings are stable
    run_order: Vec<RunId>,
    feedback: Vec<Feedback>,
    projects: Vec<Project>,
    datasets: Vec<Dataset>,
    examples: Vec<Example>,
    log: Vec<StoreOperation>,
    pending_failures: Vec<(OperationKind, TraceError)>,
}

impl MemoryState {
    fn take_failure(&mut self, kind: OperationKind) -> TraceResult<()> {
        match self.pending_failures.iter().position(|(k, _)| *k == kind) {
            Some(idx) => Err(self.pending_failures.remove(idx).1),
            None => Ok(()),
        }
    }

    fn record(&mut self, kind: OperationKind, target: Option<Uuid>) {
        self.log.push(StoreOperation { kind, target });
    }

    fn ensure_project(&mut self, name: &str) -> &Project {
        let idx = match self.projects.iter().position(|p| p.name == name) {
            Some(idx) => idx,
            None => {
                self.projects.push(Project {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    description: None,
                    created_at: Utc::now(),
                });
                self.projects.len() - 1
            }
        };
        &self.projects[idx]
    }

    fn find_project(&self, selector: &Selector) -> TraceResult<&Project> {
        self.projects
            .iter()
            .find(|p| match selector {
                Selector::Id(id) => p.id == *id,
                Selector::Name(name) => p.name == *name,
            })
            .ok_or_else(|| {
                TraceError::not_found_resource(format!("Project {:?} not found", selector), "project")
            })
    }

    fn find_dataset(&self, selector: &Selector) -> TraceResult<&Dataset> {
        self.datasets
            .iter()
            .find(|d| match selector {
                Selector::Id(id) => d.id == *id,
                Selector::Name(name) => d.name == *name,
            })
            .ok_or_else(|| {
                TraceError::not_found_resource(format!("Dataset {:?} not found", selector), "dataset")
            })
    }

    fn run_matches(&self, run: &Run, filter: &RunFilter) -> bool {
        if let Some(ids) = &filter.ids {
            if !ids.contains(&run.id) {
                return false;
            }
        }
        if let Some(name) = &filter.project_name {
            if run.session_name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        if let Some(project_id) = filter.project_id {
            let project_name = self
                .projects
                .iter()
                .find(|p| p.id == project_id)
                .map(|p| p.name.as_str());
            if project_name.is_none() || run.session_name.as_deref() != project_name {
                return false;
            }
        }
        if let Some(order) = filter.execution_order {
            if run.execution_order != order {
                return false;
            }
        }
        if let Some(has_error) = filter.error {
            if run.error.is_some() != has_error {
                return false;
            }
        }
        if let Some(parent) = filter.parent_run_id {
            if run.parent_run_id != Some(parent) {
                return false;
            }
        }
        if let Some(run_type) = &filter.run_type {
            if run.run_type != *run_type {
                return false;
            }
        }
        if let Some(example_id) = filter.reference_example_id {
            if run.reference_example_id != Some(example_id) {
                return false;
            }
        }
        true
    }
}

/// In-memory implementation of [`RunStore`] and [`CatalogStore`]
///
/// # Examples
///
/// ```
/// use tracery_core::store::{MemoryStore, OperationKind, RunStore};
/// use tracery_core::schemas::{RunCreate, RunType};
///
/// # async fn example() {
/// let store = MemoryStore::new();
/// store.fail_next(OperationKind::CreateRun, "service unavailable").await;
/// let create = RunCreate::new(uuid::Uuid::new_v4(), "root", RunType::Chain);
/// assert!(store.create_run(&create).await.is_err());
/// assert!(store.operations().await.is_empty());
/// # }
/// ```
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            latency: None,
        }
    }

    /// Delay every operation by `latency` before it touches the state
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next operation of `kind` fail with an HTTP 503 error
    pub async fn fail_next(&self, kind: OperationKind, message: impl Into<String>) {
        let error = TraceError::http_status(message, "memory://store", 503);
        self.state.lock().await.pending_failures.push((kind, error));
    }

    /// Operations completed so far, in completion order
    pub async fn operations(&self) -> Vec<StoreOperation> {
        self.state.lock().await.log.clone()
    }

    /// Number of stored runs
    pub async fn run_count(&self) -> usize {
        self.state.lock().await.runs.len()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunStore for MemoryStore {
    async fn create_run(&self, run: &RunCreate) -> TraceResult<()> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::CreateRun)?;

        let mut record = Run::from_create(run.clone());
        let project = record
            .session_name
            .get_or_insert_with(|| DEFAULT_PROJECT.to_string())
            .clone();
        state.ensure_project(&project);

        if state.runs.insert(record.id, record).is_none() {
            state.run_order.push(run.id);
        } else {
            debug!("Run {} already existed, replaced by create", run.id);
        }
        state.record(OperationKind::CreateRun, Some(run.id));
        Ok(())
    }

    async fn update_run(&self, run_id: RunId, update: &RunUpdate) -> TraceResult<()> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::UpdateRun)?;

        let run = state.runs.get_mut(&run_id).ok_or_else(|| {
            TraceError::not_found_resource(format!("Run {} not found", run_id), "run")
        })?;
        run.apply_update(update.clone());
        state.record(OperationKind::UpdateRun, Some(run_id));
        Ok(())
    }

    async fn read_run(&self, run_id: RunId) -> TraceResult<Run> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::ReadRun)?;

        let run = state.runs.get(&run_id).cloned().ok_or_else(|| {
            TraceError::not_found_resource(format!("Run {} not found", run_id), "run")
        })?;
        state.record(OperationKind::ReadRun, Some(run_id));
        Ok(run)
    }

    async fn delete_run(&self, run_id: RunId) -> TraceResult<()> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::DeleteRun)?;

        if state.runs.remove(&run_id).is_none() {
            return Err(TraceError::not_found_resource(
                format!("Run {} not found", run_id),
                "run",
            ));
        }
        state.run_order.retain(|id| *id != run_id);
        state.record(OperationKind::DeleteRun, Some(run_id));
        Ok(())
    }

    async fn list_runs(&self, filter: &RunFilter, page: PageRequest) -> TraceResult<Page<Run>> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::ListRuns)?;
        if let (None, Some(name)) = (&filter.project_id, &filter.project_name) {
            state.find_project(&Selector::Name(name.clone()))?;
        }

        let matching: Vec<Run> = state
            .run_order
            .iter()
            .filter_map(|id| state.runs.get(id))
            .filter(|run| state.run_matches(run, filter))
            .cloned()
            .collect();
        state.record(OperationKind::ListRuns, None);
        Ok(Page::slice(matching, page))
    }

    async fn read_example(&self, example_id: ExampleId) -> TraceResult<Example> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::ReadExample)?;

        let example = state
            .examples
            .iter()
            .find(|e| e.id == example_id)
            .cloned()
            .ok_or_else(|| {
                TraceError::not_found_resource(format!("Example {} not found", example_id), "example")
            })?;
        state.record(OperationKind::ReadExample, Some(example_id));
        Ok(example)
    }

    async fn create_feedback(&self, feedback: &FeedbackCreate) -> TraceResult<Feedback> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::CreateFeedback)?;

        if !state.runs.contains_key(&feedback.run_id) {
            return Err(TraceError::not_found_resource(
                format!("Run {} not found", feedback.run_id),
                "run",
            ));
        }
        let stored = feedback.clone().into_feedback(Utc::now());
        state.feedback.push(stored.clone());
        state.record(OperationKind::CreateFeedback, Some(stored.id));
        Ok(stored)
    }

    async fn list_feedback(
        &self,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Feedback>> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::ListFeedback)?;

        let matching: Vec<Feedback> = state
            .feedback
            .iter()
            .filter(|f| {
                filter
                    .run_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&f.run_id))
                    && filter.key.as_ref().is_none_or(|key| *key == f.key)
            })
            .cloned()
            .collect();
        state.record(OperationKind::ListFeedback, None);
        Ok(Page::slice(matching, page))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create_project(&self, project: &ProjectCreate) -> TraceResult<Project> {
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::Catalog)?;

        if state.projects.iter().any(|p| p.name == project.name) {
            return Err(TraceError::http_status(
                format!("Project {} already exists", project.name),
                "memory://store/sessions",
                409,
            ));
        }
        let created = Project {
            id: Uuid::new_v4(),
            name: project.name.clone(),
            description: project.description.clone(),
            created_at: Utc::now(),
        };
        state.projects.push(created.clone());
        state.record(OperationKind::Catalog, Some(created.id));
        Ok(created)
    }

    async fn read_project(&self, selector: &Selector) -> TraceResult<Project> {
        let state = self.state.lock().await;
        state.find_project(selector).cloned()
    }

    async fn list_projects(&self, page: PageRequest) -> TraceResult<Page<Project>> {
        let state = self.state.lock().await;
        Ok(Page::slice(state.projects.clone(), page))
    }

    async fn delete_project(&self, selector: &Selector) -> TraceResult<()> {
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::Catalog)?;

        let project = state.find_project(selector)?.clone();
        state.projects.retain(|p| p.id != project.id);

        let doomed: Vec<RunId> = state
            .runs
            .values()
            .filter(|run| run.session_name.as_deref() == Some(project.name.as_str()))
            .map(|run| run.id)
            .collect();
        for id in &doomed {
            state.runs.remove(id);
        }
        state.run_order.retain(|id| !doomed.contains(id));
        state.record(OperationKind::Catalog, Some(project.id));
        Ok(())
    }

    async fn create_dataset(&self, dataset: &DatasetCreate) -> TraceResult<Dataset> {
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::Catalog)?;

        if state.datasets.iter().any(|d| d.name == dataset.name) {
            return Err(TraceError::http_status(
                format!("Dataset {} already exists", dataset.name),
                "memory://store/datasets",
                409,
            ));
        }
        let created = Dataset {
            id: Uuid::new_v4(),
            name: dataset.name.clone(),
            description: dataset.description.clone(),
            data_type: dataset.data_type,
            created_at: Utc::now(),
        };
        state.datasets.push(created.clone());
        state.record(OperationKind::Catalog, Some(created.id));
        Ok(created)
    }

    async fn read_dataset(&self, selector: &Selector) -> TraceResult<Dataset> {
        let state = self.state.lock().await;
        state.find_dataset(selector).cloned()
    }

    async fn list_datasets(
        &self,
        filter: &DatasetFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Dataset>> {
        let state = self.state.lock().await;
        let matching: Vec<Dataset> = state
            .datasets
            .iter()
            .filter(|d| {
                filter.ids.as_ref().is_none_or(|ids| ids.contains(&d.id))
                    && filter.name.as_ref().is_none_or(|name| *name == d.name)
            })
            .cloned()
            .collect();
        Ok(Page::slice(matching, page))
    }

    async fn delete_dataset(&self, selector: &Selector) -> TraceResult<()> {
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::Catalog)?;

        let dataset_id = state.find_dataset(selector)?.id;
        state.datasets.retain(|d| d.id != dataset_id);
        state.examples.retain(|e| e.dataset_id != dataset_id);
        state.record(OperationKind::Catalog, Some(dataset_id));
        Ok(())
    }

    async fn create_example(&self, example: &ExampleCreate) -> TraceResult<Example> {
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::Catalog)?;

        state.find_dataset(&Selector::Id(example.dataset_id))?;
        let created = Example {
            id: example.id.unwrap_or_else(Uuid::new_v4),
            dataset_id: example.dataset_id,
            inputs: example.inputs.clone(),
            outputs: example.outputs.clone(),
            created_at: Utc::now(),
        };
        state.examples.retain(|e| e.id != created.id);
        state.examples.push(created.clone());
        state.record(OperationKind::Catalog, Some(created.id));
        Ok(created)
    }

    async fn list_examples(
        &self,
        filter: &ExampleFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Example>> {
        let state = self.state.lock().await;
        let matching: Vec<Example> = state
            .examples
            .iter()
            .filter(|e| {
                filter.dataset_id.is_none_or(|id| id == e.dataset_id)
                    && filter.ids.as_ref().is_none_or(|ids| ids.contains(&e.id))
            })
            .cloned()
            .collect();
        Ok(Page::slice(matching, page))
    }

    async fn update_example(
        &self,
        example_id: ExampleId,
        update: &ExampleUpdate,
    ) -> TraceResult<Example> {
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::Catalog)?;

        let example = state
            .examples
            .iter_mut()
            .find(|e| e.id == example_id)
            .ok_or_else(|| {
                TraceError::not_found_resource(format!("Example {} not found", example_id), "example")
            })?;
        if let Some(inputs) = &update.inputs {
            example.inputs = inputs.clone();
        }
        if let Some(outputs) = &update.outputs {
            example.outputs = Some(outputs.clone());
        }
        if let Some(dataset_id) = update.dataset_id {
            example.dataset_id = dataset_id;
        }
        let updated = example.clone();
        state.record(OperationKind::Catalog, Some(example_id));
        Ok(updated)
    }

    async fn delete_example(&self, example_id: ExampleId) -> TraceResult<()> {
        let mut state = self.state.lock().await;
        state.take_failure(OperationKind::Catalog)?;

        let before = state.examples.len();
        state.examples.retain(|e| e.id != example_id);
        if state.examples.len() == before {
            return Err(TraceError::not_found_resource(
                format!("Example {} not found", example_id),
                "example",
            ));
        }
        state.record(OperationKind::Catalog, Some(example_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{KvMap, RunType};
    use serde_json::json;

    fn kv(value: serde_json::Value) -> KvMap {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_twice_keeps_one_record() {
        let store = MemoryStore::new();
        let create = RunCreate::new(Uuid::new_v4(), "root", RunType::Chain)
            .with_inputs(kv(json!({"input": "hello world"})));

        store.create_run(&create).await.unwrap();
        store.create_run(&create).await.unwrap();

        assert_eq!(store.run_count().await, 1);
        let page = store
            .list_runs(&RunFilter::by_ids([create.id]), PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_run_rejected() {
        let store = MemoryStore::new();
        let err = store
            .update_run(Uuid::new_v4(), &RunUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TraceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_persist_update_run() {
        let store = MemoryStore::new();
        let run_id = Uuid::parse_str("8bac165f-480e-4bf8-baa0-15f2de4cc706").unwrap();
        store
            .create_run(
                &RunCreate::new(run_id, "test_run", RunType::Llm)
                    .with_project("__test_persist_update_run")
                    .with_inputs(kv(json!({"text": "hello world"}))),
            )
            .await
            .unwrap();
        store
            .update_run(run_id, &RunUpdate::outputs(kv(json!({"output": ["Hi"]}))))
            .await
            .unwrap();

        let stored = store.read_run(run_id).await.unwrap();
        assert_eq!(stored.id, run_id);
        assert_eq!(stored.outputs, Some(kv(json!({"output": ["Hi"]}))));
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next(OperationKind::CreateRun, "unavailable").await;
        let create = RunCreate::new(Uuid::new_v4(), "root", RunType::Chain);

        assert!(store.create_run(&create).await.is_err());
        assert!(store.create_run(&create).await.is_ok());
        assert_eq!(
            store.operations().await,
            vec![StoreOperation {
                kind: OperationKind::CreateRun,
                target: Some(create.id)
            }]
        );
    }

    #[tokio::test]
    async fn test_run_filters() {
        let store = MemoryStore::new();
        let root = RunCreate::new(Uuid::new_v4(), "root", RunType::Chain).with_project("p");
        let mut child = RunCreate::new(Uuid::new_v4(), "child", RunType::Llm).with_project("p");
        child.parent_run_id = Some(root.id);
        child.execution_order = 2;
        let mut failed = RunCreate::new(Uuid::new_v4(), "other", RunType::Tool).with_project("q");
        failed.error = Some("boom".to_string());

        for create in [&root, &child, &failed] {
            store.create_run(create).await.unwrap();
        }

        let roots = store
            .list_runs(
                &RunFilter::new().project_name("p").execution_order(1).error(false),
                PageRequest::first(10),
            )
            .await
            .unwrap();
        assert_eq!(roots.items.len(), 1);
        assert_eq!(roots.items[0].id, root.id);

        let children = store
            .list_runs(&RunFilter::new().parent_run_id(root.id), PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(children.items[0].id, child.id);

        let project_q = store.read_project(&Selector::from("q")).await.unwrap();
        let errored = store
            .list_runs(
                &RunFilter::new().project_id(project_q.id).error(true),
                PageRequest::first(10),
            )
            .await
            .unwrap();
        assert_eq!(errored.items.len(), 1);
        assert_eq!(errored.items[0].id, failed.id);
    }

    #[tokio::test]
    async fn test_unknown_project_name_not_found() {
        let store = MemoryStore::new();
        store
            .create_run(&RunCreate::new(Uuid::new_v4(), "r", RunType::Chain).with_project("known"))
            .await
            .unwrap();

        let err = store
            .list_runs(&RunFilter::new().project_name("ghost"), PageRequest::first(10))
            .await
            .unwrap_err();
        assert!(matches!(err, TraceError::NotFound { .. }));

        let known = store
            .list_runs(&RunFilter::new().project_name("known"), PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(known.items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_project_removes_runs() {
        let store = MemoryStore::new();
        store
            .create_project(&ProjectCreate::new("__some_project"))
            .await
            .unwrap();
        store
            .create_run(&RunCreate::new(Uuid::new_v4(), "r", RunType::Chain).with_project("__some_project"))
            .await
            .unwrap();

        store
            .delete_project(&Selector::from("__some_project"))
            .await
            .unwrap();
        assert_eq!(store.run_count().await, 0);
        assert!(store.read_project(&Selector::from("__some_project")).await.is_err());
        assert!(store.delete_project(&Selector::from("__some_project")).await.is_err());
    }

    #[tokio::test]
    async fn test_dataset_and_example_lifecycle() {
        let store = MemoryStore::new();
        let dataset = store
            .create_dataset(&DatasetCreate::new("__test_dataset").with_description("Test Dataset"))
            .await
            .unwrap();
        let example = store
            .create_example(
                &ExampleCreate::new(dataset.id, kv(json!({"col1": "addedExampleCol1"})))
                    .with_outputs(kv(json!({"col2": "addedExampleCol2"}))),
            )
            .await
            .unwrap();

        let read = store.read_example(example.id).await.unwrap();
        assert_eq!(read.inputs["col1"], json!("addedExampleCol1"));

        let updated = store
            .update_example(
                example.id,
                &ExampleUpdate {
                    inputs: Some(kv(json!({"col1": "updatedExampleCol1"}))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.inputs["col1"], json!("updatedExampleCol1"));
        assert_eq!(updated.outputs, Some(kv(json!({"col2": "addedExampleCol2"}))));

        store
            .delete_dataset(&Selector::Id(dataset.id))
            .await
            .unwrap();
        assert!(store.read_example(example.id).await.is_err());
    }
}
