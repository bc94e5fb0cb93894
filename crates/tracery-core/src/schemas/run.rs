//! Run records and the payloads used to create and update them

use super::KvMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a run, assigned client-side
pub type RunId = Uuid;

/// Kind of work a run represents.
///
/// The set is open: anything not listed is kept verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunType {
    Chain,
    Llm,
    Tool,
    Retriever,
    Prompt,
    Parser,
    Embedding,
    Custom(String),
}

impl RunType {
    /// Wire name of the run type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chain => "chain",
            Self::Llm => "llm",
            Self::Tool => "tool",
            Self::Retriever => "retriever",
            Self::Prompt => "prompt",
            Self::Parser => "parser",
            Self::Embedding => "embedding",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for RunType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "chain" => Self::Chain,
            "llm" => Self::Llm,
            "tool" => Self::Tool,
            "retriever" => Self::Retriever,
            "prompt" => Self::Prompt,
            "parser" => Self::Parser,
            "embedding" => Self::Embedding,
            _ => Self::Custom(value),
        }
    }
}

impl From<&str> for RunType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<RunType> for String {
    fn from(value: RunType) -> Self {
        match value {
            RunType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single traced execution as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    pub name: String,
    pub run_type: RunType,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub inputs: KvMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<KvMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_example_id: Option<Uuid>,
    /// Project (session) the run belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_run_id: Option<RunId>,
    /// Children in creation order
    #[serde(default)]
    pub child_run_ids: Vec<RunId>,
    /// Position in the tree's creation order, 1 for the root
    #[serde(default = "default_execution_order")]
    pub execution_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "KvMap::is_empty")]
    pub extra: KvMap,
    /// Filled in only when child runs were explicitly loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_runs: Option<Vec<Run>>,
}

fn default_execution_order() -> u32 {
    1
}

impl Run {
    /// Whether the run has an end time
    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }

    /// Whether the run has no parent
    pub fn is_root(&self) -> bool {
        self.parent_run_id.is_none()
    }

    /// Payload for creating this run remotely
    pub fn to_create(&self) -> RunCreate {
        RunCreate {
            id: self.id,
            name: self.name.clone(),
            run_type: self.run_type.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            error: self.error.clone(),
            reference_example_id: self.reference_example_id,
            session_name: self.session_name.clone(),
            parent_run_id: self.parent_run_id,
            child_run_ids: self.child_run_ids.clone(),
            execution_order: self.execution_order,
            serialized: self.serialized.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Payload for the final update of this run
    pub fn to_update(&self) -> RunUpdate {
        RunUpdate {
            end_time: self.end_time,
            outputs: self.outputs.clone(),
            error: self.error.clone(),
            child_run_ids: Some(self.child_run_ids.clone()),
            ..Default::default()
        }
    }

    /// Build a run from a create payload
    pub fn from_create(create: RunCreate) -> Self {
        Self {
            id: create.id,
            name: create.name,
            run_type: create.run_type,
            start_time: create.start_time,
            end_time: create.end_time,
            inputs: create.inputs,
            outputs: create.outputs,
            error: create.error,
            reference_example_id: create.reference_example_id,
            session_name: create.session_name,
            parent_run_id: create.parent_run_id,
            child_run_ids: create.child_run_ids,
            execution_order: create.execution_order,
            serialized: create.serialized,
            extra: create.extra,
            child_runs: None,
        }
    }

    /// Apply a partial update. Only fields present in `update` change, and an
    /// end time already set is never cleared.
    pub fn apply_update(&mut self, update: RunUpdate) {
        if let Some(end_time) = update.end_time {
            self.end_time = Some(end_time);
        }
        if let Some(outputs) = update.outputs {
            self.outputs = Some(outputs);
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        if let Some(inputs) = update.inputs {
            self.inputs = inputs;
        }
        if let Some(reference_example_id) = update.reference_example_id {
            self.reference_example_id = Some(reference_example_id);
        }
        if let Some(child_run_ids) = update.child_run_ids {
            self.child_run_ids = child_run_ids;
        }
        if let Some(extra) = update.extra {
            self.extra.extend(extra);
        }
    }
}

/// Snapshot sent when creating a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCreate {
    pub id: RunId,
    pub name: String,
    pub run_type: RunType,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub inputs: KvMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<KvMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_example_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_run_id: Option<RunId>,
    #[serde(default)]
    pub child_run_ids: Vec<RunId>,
    #[serde(default = "default_execution_order")]
    pub execution_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "KvMap::is_empty")]
    pub extra: KvMap,
}

impl RunCreate {
    /// Minimal create payload: a fresh start time and no parent
    pub fn new(id: RunId, name: impl Into<String>, run_type: impl Into<RunType>) -> Self {
        Self {
            id,
            name: name.into(),
            run_type: run_type.into(),
            start_time: Utc::now(),
            end_time: None,
            inputs: KvMap::new(),
            outputs: None,
            error: None,
            reference_example_id: None,
            session_name: None,
            parent_run_id: None,
            child_run_ids: Vec::new(),
            execution_order: 1,
            serialized: None,
            extra: KvMap::new(),
        }
    }

    /// Set inputs
    pub fn with_inputs(mut self, inputs: KvMap) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the project name
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.session_name = Some(project.into());
        self
    }
}

/// Partial update of a run; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<KvMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<KvMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_example_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_run_ids: Option<Vec<RunId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<KvMap>,
}

impl RunUpdate {
    /// Update that only sets outputs
    pub fn outputs(outputs: KvMap) -> Self {
        Self {
            outputs: Some(outputs),
            ..Default::default()
        }
    }
}
