//! Shared storage for the runs of one tree

use crate::error::{TraceError, TraceResult};
use crate::schemas::{Run, RunId};
use std::collections::HashMap;
use std::sync::Arc;

/// One run plus the bookkeeping the tree needs around it
pub(super) struct RunNode {
    pub run: Run,
    /// Set once a create call for this run has succeeded
    pub posted: bool,
    pub abandoned: bool,
    /// Serializes this run's create and update calls
    pub remote_lock: Arc<tokio::sync::Mutex<()>>,
}

/// Run records keyed by id. Parent and child links are ids held in the
/// records themselves.
pub(super) struct RunArena {
    nodes: HashMap<RunId, RunNode>,
    last_execution_order: u32,
}

pub(super) fn duplicate_id(id: &RunId) -> TraceError {
    TraceError::invalid_input_field(format!("Run id {} is already used in this tree", id), "id")
}

impl RunArena {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            last_execution_order: 0,
        }
    }

    /// Next execution order in creation order across the whole tree; the root
    /// gets 1
    pub fn next_execution_order(&mut self) -> u32 {
        self.last_execution_order += 1;
        self.last_execution_order
    }

    pub fn contains(&self, id: &RunId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Add a run; an id already in the tree is rejected and the stored run
    /// is left untouched
    pub fn insert(&mut self, run: Run) -> TraceResult<()> {
        if self.contains(&run.id) {
            return Err(duplicate_id(&run.id));
        }
        self.nodes.insert(
            run.id,
            RunNode {
                run,
                posted: false,
                abandoned: false,
                remote_lock: Arc::new(tokio::sync::Mutex::new(())),
            },
        );
        Ok(())
    }

    pub fn get(&self, id: &RunId) -> Option<&RunNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &RunId) -> Option<&mut RunNode> {
        self.nodes.get_mut(id)
    }

    /// Ended, and every child is complete or abandoned
    pub fn is_complete(&self, id: &RunId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        node.run.is_ended()
            && node.run.child_run_ids.iter().all(|child| {
                self.nodes
                    .get(child)
                    .is_some_and(|c| c.abandoned || self.is_complete(child))
            })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
