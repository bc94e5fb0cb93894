//! Run tree handles

use super::arena::{RunArena, duplicate_id};
use super::config::RunTreeConfig;
use crate::config::DEFAULT_PROJECT;
use crate::error::{TraceError, TraceResult};
use crate::schemas::{KvMap, Run, RunId};
use crate::store::RunStore;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Handle to one run inside a tree of runs
///
/// Every handle of a tree shares the same arena, so a child handle and its
/// parent see each other's changes. Handles are cheap to clone and can be
/// moved across tasks.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use serde_json::json;
/// use tracery_core::run_tree::{RunTree, RunTreeConfig};
/// use tracery_core::schemas::RunType;
/// use tracery_core::store::MemoryStore;
///
/// # async fn example() -> tracery_core::error::TraceResult<()> {
/// let store = Arc::new(MemoryStore::new());
/// let inputs = json!({"input": "hello world"}).as_object().cloned().unwrap_or_default();
/// let root = RunTree::new(RunTreeConfig::new("agent", RunType::Chain).with_inputs(inputs), store)?;
/// root.post().await?;
///
/// let llm = root.create_child(RunTreeConfig::new("llm", RunType::Llm))?;
/// llm.post().await?;
/// llm.end(json!({"output": "hi"}).as_object().cloned().unwrap_or_default())?;
/// llm.patch().await?;
///
/// root.end(Default::default())?;
/// root.patch().await?;
/// assert!(root.is_complete());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RunTree {
    id: RunId,
    arena: Arc<Mutex<RunArena>>,
    store: Arc<dyn RunStore>,
}

impl std::fmt::Debug for RunTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunTree").field("id", &self.id).finish()
    }
}

fn check_name(name: &str) -> TraceResult<()> {
    if name.trim().is_empty() {
        return Err(TraceError::invalid_input_field(
            "Run name must not be empty",
            "name",
        ));
    }
    Ok(())
}

fn build_run(
    config: RunTreeConfig,
    project: String,
    parent_run_id: Option<RunId>,
    execution_order: u32,
) -> Run {
    Run {
        id: config.id.unwrap_or_else(Uuid::new_v4),
        name: config.name,
        run_type: config.run_type,
        start_time: config.start_time.unwrap_or_else(Utc::now),
        end_time: None,
        inputs: config.inputs,
        outputs: None,
        error: None,
        reference_example_id: config.reference_example_id,
        session_name: Some(project),
        parent_run_id,
        child_run_ids: Vec::new(),
        execution_order,
        serialized: config.serialized,
        extra: config.extra,
        child_runs: None,
    }
}

impl RunTree {
    /// Start a new tree with a root run. Nothing is sent until [`RunTree::post`].
    pub fn new(config: RunTreeConfig, store: Arc<dyn RunStore>) -> TraceResult<Self> {
        check_name(&config.name)?;
        let project = config
            .project_name
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT.to_string());

        let mut arena = RunArena::new();
        let order = arena.next_execution_order();
        let run = build_run(config, project, None, order);
        let id = run.id;
        arena.insert(run)?;

        debug!("Started run tree with root {}", id);
        Ok(Self {
            id,
            arena: Arc::new(Mutex::new(arena)),
            store,
        })
    }

    fn handle(&self, id: RunId) -> Self {
        Self {
            id,
            arena: Arc::clone(&self.arena),
            store: Arc::clone(&self.store),
        }
    }

    fn missing(&self) -> TraceError {
        TraceError::invalid_state(format!("Run {} is not part of this tree", self.id))
    }

    /// Begin a child run. The child inherits this run's project and gets the
    /// next execution order of the tree.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the name is empty or `config.id` already names a
    /// run of this tree. A rejected call uses no execution order.
    pub fn create_child(&self, config: RunTreeConfig) -> TraceResult<RunTree> {
        check_name(&config.name)?;
        let mut arena = self.arena.lock();

        let project = arena
            .get(&self.id)
            .and_then(|node| node.run.session_name.clone())
            .ok_or_else(|| self.missing())?;
        if let Some(id) = config.id.as_ref().filter(|id| arena.contains(id)) {
            return Err(duplicate_id(id));
        }
        let order = arena.next_execution_order();
        let child = build_run(config, project, Some(self.id), order);
        let child_id = child.id;
        arena.insert(child)?;

        let parent = arena.get_mut(&self.id).ok_or_else(|| self.missing())?;
        parent.run.child_run_ids.push(child_id);
        drop(arena);

        debug!(
            "Created child run {} under {} (execution order {})",
            child_id, self.id, order
        );
        Ok(self.handle(child_id))
    }

    /// Record outputs and the end time
    pub fn end(&self, outputs: KvMap) -> TraceResult<()> {
        self.finish(Some(outputs), None)
    }

    /// Record an error and the end time
    pub fn end_with_error(&self, error: impl Into<String>) -> TraceResult<()> {
        self.finish(None, Some(error.into()))
    }

    fn finish(&self, outputs: Option<KvMap>, error: Option<String>) -> TraceResult<()> {
        let mut arena = self.arena.lock();
        let node = arena.get_mut(&self.id).ok_or_else(|| self.missing())?;
        if let Some(end_time) = node.run.end_time {
            return Err(TraceError::invalid_state_with_context(
                format!("Run {} has already ended", self.id),
                format!("Ended at {}", end_time),
            ));
        }
        node.run.end_time = Some(Utc::now());
        node.run.outputs = outputs;
        node.run.error = error;
        Ok(())
    }

    /// Create the run remotely from its current state.
    ///
    /// Posting again is allowed; the store keeps one record per id.
    #[instrument(skip(self), fields(run_id = %self.id), level = "debug")]
    pub async fn post(&self) -> TraceResult<()> {
        let remote_lock = self.remote_lock()?;
        let _guard = remote_lock.lock().await;

        let create = self.snapshot()?.to_create();
        if let Err(e) = self.store.create_run(&create).await {
            warn!("Failed to create run {}: {}", self.id, e);
            return Err(e);
        }

        if let Some(node) = self.arena.lock().get_mut(&self.id) {
            node.posted = true;
        }
        debug!("Created run {}", self.id);
        Ok(())
    }

    /// Send the end time, outputs and error to the store.
    ///
    /// Waits for an in-flight [`RunTree::post`] of the same run. Fails without
    /// any I/O if the run was never posted successfully.
    #[instrument(skip(self), fields(run_id = %self.id), level = "debug")]
    pub async fn patch(&self) -> TraceResult<()> {
        let remote_lock = self.remote_lock()?;
        let _guard = remote_lock.lock().await;

        if !self.is_posted() {
            return Err(TraceError::invalid_state_with_context(
                format!("Run {} has not been created remotely", self.id),
                "Call post() before patch()",
            ));
        }

        let update = self.snapshot()?.to_update();
        if let Err(e) = self.store.update_run(self.id, &update).await {
            warn!("Failed to update run {}: {}", self.id, e);
            return Err(e);
        }
        debug!("Updated run {}", self.id);
        Ok(())
    }

    /// Stop this run from blocking its parent's completeness
    pub fn abandon(&self) -> TraceResult<()> {
        let mut arena = self.arena.lock();
        let node = arena.get_mut(&self.id).ok_or_else(|| self.missing())?;
        node.abandoned = true;
        Ok(())
    }

    fn remote_lock(&self) -> TraceResult<Arc<tokio::sync::Mutex<()>>> {
        let arena = self.arena.lock();
        arena
            .get(&self.id)
            .map(|node| Arc::clone(&node.remote_lock))
            .ok_or_else(|| self.missing())
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    /// Copy of the run record as it stands
    pub fn snapshot(&self) -> TraceResult<Run> {
        let arena = self.arena.lock();
        arena
            .get(&self.id)
            .map(|node| node.run.clone())
            .ok_or_else(|| self.missing())
    }

    /// Handles of the direct children, in creation order
    pub fn children(&self) -> Vec<RunTree> {
        let child_ids = self
            .arena
            .lock()
            .get(&self.id)
            .map(|node| node.run.child_run_ids.clone())
            .unwrap_or_default();
        child_ids.into_iter().map(|id| self.handle(id)).collect()
    }

    /// Handle of the parent run, if this is not the root
    pub fn parent(&self) -> Option<RunTree> {
        let parent_id = self.arena.lock().get(&self.id)?.run.parent_run_id?;
        Some(self.handle(parent_id))
    }

    pub fn execution_order(&self) -> u32 {
        self.arena
            .lock()
            .get(&self.id)
            .map_or(0, |node| node.run.execution_order)
    }

    pub fn is_ended(&self) -> bool {
        self.arena
            .lock()
            .get(&self.id)
            .is_some_and(|node| node.run.is_ended())
    }

    pub fn is_posted(&self) -> bool {
        self.arena.lock().get(&self.id).is_some_and(|node| node.posted)
    }

    pub fn is_abandoned(&self) -> bool {
        self.arena
            .lock()
            .get(&self.id)
            .is_some_and(|node| node.abandoned)
    }

    /// Ended, with every known child complete or abandoned
    pub fn is_complete(&self) -> bool {
        self.arena.lock().is_complete(&self.id)
    }

    /// Number of runs in the whole tree
    pub fn tree_size(&self) -> usize {
        self.arena.lock().len()
    }
}
