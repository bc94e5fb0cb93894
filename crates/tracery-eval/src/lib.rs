//! Tracery Evaluation
//!
//! Grades recorded runs and attaches the grades to them as feedback.
//!
//! # Example
//!
//! ```rust,ignore
//! use tracery_eval::{ClientEvaluateExt, EvaluateOptions, StringEvaluator};
//!
//! let evaluator = StringEvaluator::jaccard();
//! let run = client.read_run(run_id).await?;
//! let feedback = client
//!     .evaluate_run(&run, &evaluator, &EvaluateOptions::default())
//!     .await?;
//! ```

pub mod client_ext;
pub mod evaluator;
pub mod runner;

// Re-exports for convenience
pub use client_ext::ClientEvaluateExt;
pub use evaluator::{
    EvaluationResult, GradingInput, GradingOutput, JaccardGrader, RunEvaluator, StringEvaluator,
    jaccard_chars,
};
pub use runner::{EvaluateOptions, EvaluationRunner, EvaluationSummary, RunOutcome};
