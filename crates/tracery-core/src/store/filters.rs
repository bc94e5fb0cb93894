//! Query filters handed to list endpoints
//!
//! Filters are passed through to the store untouched; evaluating them is the
//! store's job, never the cursor's.

use crate::schemas::{DatasetId, ExampleId, ProjectId, RunId, RunType};

/// Narrowing predicates for listing runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFilter {
    /// Only runs whose id is in this set
    pub ids: Option<Vec<RunId>>,
    pub project_name: Option<String>,
    pub project_id: Option<ProjectId>,
    /// 1 selects root runs
    pub execution_order: Option<u32>,
    /// `Some(false)` selects runs without an error
    pub error: Option<bool>,
    pub parent_run_id: Option<RunId>,
    pub run_type: Option<RunType>,
    pub reference_example_id: Option<ExampleId>,
}

impl RunFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_ids(ids: impl IntoIterator<Item = RunId>) -> Self {
        Self {
            ids: Some(ids.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn project_id(mut self, id: ProjectId) -> Self {
        self.project_id = Some(id);
        self
    }

    pub fn execution_order(mut self, order: u32) -> Self {
        self.execution_order = Some(order);
        self
    }

    pub fn error(mut self, has_error: bool) -> Self {
        self.error = Some(has_error);
        self
    }

    pub fn parent_run_id(mut self, id: RunId) -> Self {
        self.parent_run_id = Some(id);
        self
    }

    pub fn run_type(mut self, run_type: impl Into<RunType>) -> Self {
        self.run_type = Some(run_type.into());
        self
    }

    pub fn reference_example_id(mut self, id: ExampleId) -> Self {
        self.reference_example_id = Some(id);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilter {
    pub run_ids: Option<Vec<RunId>>,
    pub key: Option<String>,
}

impl FeedbackFilter {
    pub fn for_runs(run_ids: impl IntoIterator<Item = RunId>) -> Self {
        Self {
            run_ids: Some(run_ids.into_iter().collect()),
            key: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetFilter {
    pub ids: Option<Vec<DatasetId>>,
    pub name: Option<String>,
}

impl DatasetFilter {
    pub fn by_ids(ids: impl IntoIterator<Item = DatasetId>) -> Self {
        Self {
            ids: Some(ids.into_iter().collect()),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            ids: None,
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExampleFilter {
    pub dataset_id: Option<DatasetId>,
    pub ids: Option<Vec<ExampleId>>,
}

impl ExampleFilter {
    pub fn for_dataset(dataset_id: DatasetId) -> Self {
        Self {
            dataset_id: Some(dataset_id),
            ids: None,
        }
    }
}
