//! Evaluators grade runs and produce evaluation results
//!
//! [`RunEvaluator`] is the contract the runner drives. [`StringEvaluator`]
//! covers the common case of comparing a run's output text with a reference
//! answer through a [`Grader`], and ships with Jaccard and exact-match graders.

mod exact_match;
mod jaccard;
mod string_evaluator;
mod types;

pub use exact_match::exact_match;
pub use jaccard::{DEFAULT_JACCARD_THRESHOLD, JaccardGrader, jaccard_chars};
pub use string_evaluator::{
    DEFAULT_ANSWER_KEY, DEFAULT_INPUT_KEY, DEFAULT_PREDICTION_KEY, StringEvaluator,
};
pub use types::{
    AMBIGUOUS, AMBIGUOUS_SCORE, CORRECT, EvaluationResult, Grader, GradingInput, GradingOutput,
    INCORRECT, RunEvaluator,
};
