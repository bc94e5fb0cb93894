//! Aggregate outcome of evaluating a cursor of runs

use tracery_core::error::TraceError;
use tracery_core::schemas::{Feedback, RunId};

/// Result of evaluating one run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub result: Result<Feedback, TraceError>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes in cursor order, plus the cursor error that stopped iteration
#[derive(Debug, Clone, Default)]
pub struct EvaluationSummary {
    pub outcomes: Vec<RunOutcome>,
    pub cursor_error: Option<TraceError>,
}

impl EvaluationSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Whether every run was evaluated and the cursor was drained
    pub fn is_complete(&self) -> bool {
        self.cursor_error.is_none() && self.failed() == 0
    }

    /// Stored feedback, in cursor order
    pub fn feedback(&self) -> impl Iterator<Item = &Feedback> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Mean over feedback that carries a score
    pub fn mean_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self.feedback().filter_map(|f| f.score).collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
