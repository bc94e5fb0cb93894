//! Evaluation entry points on [`Client`]

use crate::evaluator::RunEvaluator;
use crate::runner::{EvaluateOptions, EvaluationRunner, EvaluationSummary};
use async_trait::async_trait;
use tracery_core::Client;
use tracery_core::error::TraceResult;
use tracery_core::schemas::{Feedback, Run};
use tracery_core::store::RunFilter;

/// Adds `evaluate_run` and `evaluate_runs` to the core client
#[async_trait]
pub trait ClientEvaluateExt {
    /// Grade one run and store the feedback
    async fn evaluate_run(
        &self,
        run: &Run,
        evaluator: &dyn RunEvaluator,
        options: &EvaluateOptions,
    ) -> TraceResult<Feedback>;

    /// Grade every run matching `filter`
    async fn evaluate_runs(
        &self,
        filter: RunFilter,
        evaluator: &dyn RunEvaluator,
        options: &EvaluateOptions,
    ) -> EvaluationSummary;
}

#[async_trait]
impl ClientEvaluateExt for Client {
    async fn evaluate_run(
        &self,
        run: &Run,
        evaluator: &dyn RunEvaluator,
        options: &EvaluateOptions,
    ) -> TraceResult<Feedback> {
        EvaluationRunner::from_client(self)
            .evaluate_run(run, evaluator, options)
            .await
    }

    async fn evaluate_runs(
        &self,
        filter: RunFilter,
        evaluator: &dyn RunEvaluator,
        options: &EvaluateOptions,
    ) -> EvaluationSummary {
        EvaluationRunner::from_client(self)
            .evaluate_runs(self.list_runs(filter), evaluator, options)
            .await
    }
}
