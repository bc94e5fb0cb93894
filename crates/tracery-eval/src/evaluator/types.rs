//! Evaluator contract and grading value types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracery_core::error::TraceResult;
use tracery_core::schemas::{Example, KvMap, Run};

/// Value for a prediction that matches its answer
pub const CORRECT: &str = "CORRECT";
/// Value for a prediction that does not match its answer
pub const INCORRECT: &str = "INCORRECT";
/// Value given when there was no answer to grade against
pub const AMBIGUOUS: &str = "AMBIGUOUS";
/// Score given together with [`AMBIGUOUS`]
pub const AMBIGUOUS_SCORE: f64 = -0.5;

/// Outcome of grading one run, turned into a feedback record by the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Metric name; becomes the feedback key
    pub key: String,
    pub score: Option<f64>,
    pub value: Option<String>,
    pub comment: Option<String>,
    pub correction: Option<serde_json::Value>,
    /// Extra metadata merged into the feedback source
    #[serde(default)]
    pub evaluator_info: KvMap,
}

impl EvaluationResult {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            score: None,
            value: None,
            comment: None,
            correction: None,
            evaluator_info: KvMap::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Text extracted from a run and its reference example
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingInput {
    pub input: String,
    pub prediction: String,
    /// `None` when there is no reference answer
    pub answer: Option<String>,
}

/// Result of a grading function
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradingOutput {
    pub score: Option<f64>,
    pub value: Option<String>,
    pub comment: Option<String>,
}

impl GradingOutput {
    /// Sentinel output for a prediction without an answer
    pub fn ambiguous() -> Self {
        Self {
            score: Some(AMBIGUOUS_SCORE),
            value: Some(AMBIGUOUS.to_string()),
            comment: None,
        }
    }

    /// Score plus `CORRECT` or `INCORRECT`
    pub fn verdict(score: f64, correct: bool) -> Self {
        Self {
            score: Some(score),
            value: Some(if correct { CORRECT } else { INCORRECT }.to_string()),
            comment: None,
        }
    }
}

/// Grades one run, optionally against its reference example
#[async_trait]
pub trait RunEvaluator: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    async fn evaluate_run(&self, run: &Run, example: Option<&Example>)
    -> TraceResult<EvaluationResult>;
}

/// A grading function over extracted text.
///
/// Asynchronous so a grader can call out to a model. Plain synchronous
/// functions and closures implement it through the blanket impl.
#[async_trait]
pub trait Grader: Send + Sync {
    async fn grade(&self, input: &GradingInput) -> TraceResult<GradingOutput>;
}

#[async_trait]
impl<F> Grader for F
where
    F: Fn(&GradingInput) -> TraceResult<GradingOutput> + Send + Sync,
{
    async fn grade(&self, input: &GradingInput) -> TraceResult<GradingOutput> {
        self(input)
    }
}
