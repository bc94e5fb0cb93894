//! Records exchanged with the tracing service

mod dataset;
mod feedback;
mod project;
mod run;

pub use dataset::{
    DataType, Dataset, DatasetCreate, DatasetId, Example, ExampleCreate, ExampleId, ExampleUpdate,
};
pub use feedback::{Feedback, FeedbackCreate, FeedbackId, FeedbackSource, FeedbackSourceType};
pub use project::{Project, ProjectCreate, ProjectId, Selector};
pub use run::{Run, RunCreate, RunId, RunType, RunUpdate};

/// Structured key-value payload used for inputs, outputs and metadata
pub type KvMap = serde_json::Map<String, serde_json::Value>;
