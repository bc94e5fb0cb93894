//! Tracery
//!
//! Records traced executions as trees of runs, lists them back lazily, and
//! grades them with evaluators whose results are stored as feedback.
//!
//! ```rust,ignore
//! use tracery::{Client, ClientConfig, RunTreeConfig, RunType};
//!
//! tracery::logging::init(&Default::default())?;
//! let client = Client::new(ClientConfig::default())?;
//! let root = client.create_run_tree(RunTreeConfig::new("agent", RunType::Chain))?;
//! root.post().await?;
//! root.end(outputs)?;
//! root.patch().await?;
//! ```

pub mod logging;

pub use tracery_core::{
    CatalogStore, Client, ClientConfig, HttpStore, LoggingConfig, MemoryStore, Page, PageRequest,
    PageStream, RunStore, RunTree, RunTreeConfig, TraceError, TraceResult, client, config, error,
    pagination, run_tree, schemas, store,
};
pub use tracery_core::schemas::*;
pub use tracery_eval::{
    ClientEvaluateExt, EvaluateOptions, EvaluationResult, EvaluationRunner, EvaluationSummary,
    GradingInput, GradingOutput, JaccardGrader, RunEvaluator, RunOutcome, StringEvaluator,
    evaluator, jaccard_chars, runner,
};
