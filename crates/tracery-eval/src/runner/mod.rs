//! Evaluation orchestration

mod options;
mod orchestrator;
mod summary;

#[cfg(test)]
mod tests;

pub use options::EvaluateOptions;
pub use orchestrator::EvaluationRunner;
pub use summary::{EvaluationSummary, RunOutcome};
