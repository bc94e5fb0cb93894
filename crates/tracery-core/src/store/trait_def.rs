//! Remote store trait definitions

use super::filters::{DatasetFilter, ExampleFilter, FeedbackFilter, RunFilter};
use crate::error::TraceResult;
use crate::pagination::{Page, PageRequest};
use crate::schemas::{
    Dataset, DatasetCreate, Example, ExampleCreate, ExampleId, ExampleUpdate, Feedback,
    FeedbackCreate, Project, ProjectCreate, Run, RunCreate, RunId, RunUpdate, Selector,
};
use async_trait::async_trait;

/// Run, feedback and reference-example operations consumed by run trees and
/// the evaluation pipeline.
///
/// Implementations perform no retries; a failed call is reported as-is.
///
/// # Examples
///
/// ```no_run
/// use tracery_core::store::{MemoryStore, RunStore};
/// use tracery_core::schemas::{RunCreate, RunType};
///
/// # async fn example() -> tracery_core::error::TraceResult<()> {
/// let store = MemoryStore::new();
/// let create = RunCreate::new(uuid::Uuid::new_v4(), "test_run", RunType::Llm);
/// store.create_run(&create).await?;
/// let run = store.read_run(create.id).await?;
/// assert_eq!(run.name, "test_run");
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Create a run. Creating an id that already exists replaces the record.
    async fn create_run(&self, run: &RunCreate) -> TraceResult<()>;

    /// Apply a partial update to an existing run
    async fn update_run(&self, run_id: RunId, update: &RunUpdate) -> TraceResult<()>;

    /// Fetch the current remote state of a run
    async fn read_run(&self, run_id: RunId) -> TraceResult<Run>;

    /// Delete a run
    async fn delete_run(&self, run_id: RunId) -> TraceResult<()>;

    /// Fetch one page of runs matching `filter`. A project name that names
    /// no project is `NotFound`.
    async fn list_runs(&self, filter: &RunFilter, page: PageRequest) -> TraceResult<Page<Run>>;

    /// Fetch a dataset example by id
    async fn read_example(&self, example_id: ExampleId) -> TraceResult<Example>;

    /// Store a feedback record
    async fn create_feedback(&self, feedback: &FeedbackCreate) -> TraceResult<Feedback>;

    /// Fetch one page of feedback matching `filter`
    async fn list_feedback(
        &self,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Feedback>>;
}

/// Project, dataset and example management
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_project(&self, project: &ProjectCreate) -> TraceResult<Project>;

    async fn read_project(&self, selector: &Selector) -> TraceResult<Project>;

    async fn list_projects(&self, page: PageRequest) -> TraceResult<Page<Project>>;

    /// Delete a project together with its runs
    async fn delete_project(&self, selector: &Selector) -> TraceResult<()>;

    async fn create_dataset(&self, dataset: &DatasetCreate) -> TraceResult<Dataset>;

    async fn read_dataset(&self, selector: &Selector) -> TraceResult<Dataset>;

    async fn list_datasets(
        &self,
        filter: &DatasetFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Dataset>>;

    /// Delete a dataset together with its examples
    async fn delete_dataset(&self, selector: &Selector) -> TraceResult<()>;

    async fn create_example(&self, example: &ExampleCreate) -> TraceResult<Example>;

    async fn list_examples(
        &self,
        filter: &ExampleFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Example>>;

    async fn update_example(
        &self,
        example_id: ExampleId,
        update: &ExampleUpdate,
    ) -> TraceResult<Example>;

    async fn delete_example(&self, example_id: ExampleId) -> TraceResult<()>;
}
