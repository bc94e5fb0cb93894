//! Construction parameters for run tree nodes

use crate::schemas::{ExampleId, KvMap, RunId, RunType};
use chrono::{DateTime, Utc};

/// Parameters for a new root run or child run
///
/// Fields left as `None` are filled in when the run is built: a fresh id, the
/// current time, and (for roots) the default project.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTreeConfig {
    pub name: String,
    pub run_type: RunType,
    pub inputs: KvMap,
    /// Ignored for children, which inherit their parent's project
    pub project_name: Option<String>,
    pub reference_example_id: Option<ExampleId>,
    pub serialized: Option<serde_json::Value>,
    pub id: Option<RunId>,
    pub start_time: Option<DateTime<Utc>>,
    pub extra: KvMap,
}

impl RunTreeConfig {
    pub fn new(name: impl Into<String>, run_type: impl Into<RunType>) -> Self {
        Self {
            name: name.into(),
            run_type: run_type.into(),
            inputs: KvMap::new(),
            project_name: None,
            reference_example_id: None,
            serialized: None,
            id: None,
            start_time: None,
            extra: KvMap::new(),
        }
    }

    pub fn with_inputs(mut self, inputs: KvMap) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project_name = Some(project.into());
        self
    }

    pub fn with_reference_example(mut self, example_id: ExampleId) -> Self {
        self.reference_example_id = Some(example_id);
        self
    }

    pub fn with_serialized(mut self, serialized: serde_json::Value) -> Self {
        self.serialized = Some(serialized);
        self
    }

    pub fn with_id(mut self, id: RunId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_extra(mut self, extra: KvMap) -> Self {
        self.extra = extra;
        self
    }
}
