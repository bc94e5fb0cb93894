//! High-level client over a run store and catalog store

use crate::config::{ClientConfig, load_config};
use crate::error::{TraceError, TraceResult};
use crate::pagination::{Page, PageRequest, PageStream, paginate};
use crate::run_tree::{RunTree, RunTreeConfig};
use crate::schemas::{
    Dataset, DatasetCreate, DatasetId, Example, ExampleCreate, ExampleId, ExampleUpdate, Feedback,
    FeedbackCreate, Project, ProjectCreate, Run, RunCreate, RunId, RunUpdate, Selector,
};
use crate::store::{
    CatalogStore, DatasetFilter, ExampleFilter, FeedbackFilter, HttpStore, RunFilter, RunStore,
    load_child_runs,
};
use std::sync::Arc;
use tracing::debug;

/// Entry point for application code
///
/// Wraps a store pair and the client configuration. List operations return
/// lazy cursors that fetch `page_size` items per request.
///
/// # Examples
///
/// ```no_run
/// use futures::TryStreamExt;
/// use tracery_core::Client;
/// use tracery_core::config::ClientConfig;
/// use tracery_core::store::RunFilter;
///
/// # async fn example() -> tracery_core::error::TraceResult<()> {
/// let client = Client::new(ClientConfig::new("http://localhost:1984"))?;
/// let roots: Vec<_> = client
///     .list_runs(RunFilter::new().project_name("default").execution_order(1))
///     .try_collect()
///     .await?;
/// println!("{} root runs", roots.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    runs: Arc<dyn RunStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl Client {
    /// Client talking to the HTTP API named in `config`
    pub fn new(config: ClientConfig) -> TraceResult<Self> {
        let store = Arc::new(HttpStore::new(config.clone())?);
        Self::with_store(store, config)
    }

    /// Client configured from the default file and environment
    pub fn from_env() -> TraceResult<Self> {
        Self::new(load_config()?)
    }

    /// Client over any store implementing both contracts
    pub fn with_store<S>(store: Arc<S>, config: ClientConfig) -> TraceResult<Self>
    where
        S: RunStore + CatalogStore + 'static,
    {
        config.validate()?;
        let runs: Arc<dyn RunStore> = store.clone();
        let catalog: Arc<dyn CatalogStore> = store;
        Ok(Self {
            config,
            runs,
            catalog,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn run_store(&self) -> Arc<dyn RunStore> {
        Arc::clone(&self.runs)
    }

    pub fn catalog_store(&self) -> Arc<dyn CatalogStore> {
        Arc::clone(&self.catalog)
    }

    fn first_page(&self) -> PageRequest {
        PageRequest::first(self.config.page_size)
    }

    /// Start a run tree on this client's store. A config without a project
    /// gets the configured default project.
    pub fn create_run_tree(&self, mut config: RunTreeConfig) -> TraceResult<RunTree> {
        if config.project_name.is_none() {
            config.project_name = Some(self.config.default_project.clone());
        }
        RunTree::new(config, self.run_store())
    }

    // Runs

    pub async fn create_run(&self, run: &RunCreate) -> TraceResult<()> {
        self.runs.create_run(run).await
    }

    pub async fn update_run(&self, run_id: RunId, update: &RunUpdate) -> TraceResult<()> {
        self.runs.update_run(run_id, update).await
    }

    pub async fn read_run(&self, run_id: RunId) -> TraceResult<Run> {
        self.runs.read_run(run_id).await
    }

    /// Read a run and attach its descendants as `child_runs`
    pub async fn read_run_with_children(&self, run_id: RunId) -> TraceResult<Run> {
        let mut run = self.runs.read_run(run_id).await?;
        load_child_runs(&self.runs, &mut run, self.config.page_size).await?;
        Ok(run)
    }

    pub async fn delete_run(&self, run_id: RunId) -> TraceResult<()> {
        self.runs.delete_run(run_id).await
    }

    /// Lazily list runs matching `filter`
    pub fn list_runs(&self, filter: RunFilter) -> PageStream<Run> {
        debug!("Listing runs with {:?}", filter);
        let store = self.run_store();
        paginate(self.first_page(), move |page| {
            let store = Arc::clone(&store);
            let filter = filter.clone();
            async move { store.list_runs(&filter, page).await }
        })
    }

    // Feedback

    pub async fn create_feedback(&self, feedback: &FeedbackCreate) -> TraceResult<Feedback> {
        self.runs.create_feedback(feedback).await
    }

    pub fn list_feedback(&self, filter: FeedbackFilter) -> PageStream<Feedback> {
        let store = self.run_store();
        paginate(self.first_page(), move |page| {
            let store = Arc::clone(&store);
            let filter = filter.clone();
            async move { store.list_feedback(&filter, page).await }
        })
    }

    // Projects

    pub async fn create_project(&self, project: &ProjectCreate) -> TraceResult<Project> {
        self.catalog.create_project(project).await
    }

    pub async fn read_project(&self, selector: impl Into<Selector>) -> TraceResult<Project> {
        self.catalog.read_project(&selector.into()).await
    }

    pub async fn delete_project(&self, selector: impl Into<Selector>) -> TraceResult<()> {
        self.catalog.delete_project(&selector.into()).await
    }

    pub fn list_projects(&self) -> PageStream<Project> {
        let store = self.catalog_store();
        paginate(self.first_page(), move |page| {
            let store = Arc::clone(&store);
            async move { store.list_projects(page).await }
        })
    }

    // Datasets and examples

    pub async fn create_dataset(&self, dataset: &DatasetCreate) -> TraceResult<Dataset> {
        self.catalog.create_dataset(dataset).await
    }

    pub async fn read_dataset(&self, selector: impl Into<Selector>) -> TraceResult<Dataset> {
        self.catalog.read_dataset(&selector.into()).await
    }

    pub async fn delete_dataset(&self, selector: impl Into<Selector>) -> TraceResult<()> {
        self.catalog.delete_dataset(&selector.into()).await
    }

    pub fn list_datasets(&self, filter: DatasetFilter) -> PageStream<Dataset> {
        let store = self.catalog_store();
        paginate(self.first_page(), move |page| {
            let store = Arc::clone(&store);
            let filter = filter.clone();
            async move { store.list_datasets(&filter, page).await }
        })
    }

    pub async fn create_example(&self, example: &ExampleCreate) -> TraceResult<Example> {
        self.catalog.create_example(example).await
    }

    pub async fn read_example(&self, example_id: ExampleId) -> TraceResult<Example> {
        self.runs.read_example(example_id).await
    }

    pub async fn update_example(
        &self,
        example_id: ExampleId,
        update: &ExampleUpdate,
    ) -> TraceResult<Example> {
        self.catalog.update_example(example_id, update).await
    }

    pub async fn delete_example(&self, example_id: ExampleId) -> TraceResult<()> {
        self.catalog.delete_example(example_id).await
    }

    /// Lazily list the examples of a dataset
    pub fn list_examples(&self, dataset: impl Into<Selector>) -> PageStream<Example> {
        let store = self.catalog_store();
        let selector = dataset.into();
        let start: (Option<DatasetId>, PageRequest) = (None, self.first_page());
        paginate(start, move |(dataset_id, page)| {
            let store = Arc::clone(&store);
            let selector = selector.clone();
            async move {
                let dataset_id = match dataset_id {
                    Some(id) => id,
                    None => match selector {
                        Selector::Id(id) => id,
                        Selector::Name(_) => store.read_dataset(&selector).await?.id,
                    },
                };
                let result = store
                    .list_examples(&ExampleFilter::for_dataset(dataset_id), page)
                    .await?;
                Ok::<_, TraceError>(Page::new(
                    result.items,
                    result.next.map(|next| (Some(dataset_id), next)),
                ))
            }
        })
    }
}
